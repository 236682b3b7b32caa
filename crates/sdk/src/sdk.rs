use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use patra_core::{
    CaptureOptions, ChequeRecord, DocumentType, ENachRecord, ImageLocator, OcrConfig,
    Outcome, ProcessingOptions, ScannerMode,
};
use patra_pipeline::capture::{CaptureCoordinator, CaptureError, DocumentCapture};
use patra_pipeline::detect::KeywordDetector;
use patra_pipeline::model::GenerativeModel;
use patra_pipeline::process::{DocumentProcessor, ProcessedDocument};
use patra_pipeline::recognizer::{RecognizeError, RecognizedText, TextRecognizer};
use patra_pipeline::scanner::{DocumentScan, DocumentScanner};

use crate::info::SdkInfo;

pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("SDK not initialized. Call initialize() first")]
    NotInitialized,
    #[error("Regional compliance validation failed - must use asia-south1")]
    RegionalCompliance,
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("Text recognition failed: {0}")]
    Recognition(#[from] RecognizeError),
}

/// Combined result of a typed capture flow: the capture itself, the
/// wall-clock for the whole flow, and the processing envelope.
/// `total_time_ms` starts before capture and is distinct from the
/// record-level processing time, which starts at extraction.
#[derive(Debug, Clone)]
pub struct CaptureFlow<T> {
    pub capture: DocumentCapture,
    pub total_time_ms: u64,
    pub outcome: Outcome<T>,
}

/// Result of the auto-detecting capture flow. `document_type` is the
/// detection verdict and may be `Unknown` even though processing fell back
/// to the cheque flow.
#[derive(Debug, Clone)]
pub struct DocumentCaptureFlow {
    pub capture: DocumentCapture,
    pub total_time_ms: u64,
    pub document_type: DocumentType,
    pub processed: ProcessedDocument,
}

/// Result of processing an already-captured image.
#[derive(Debug, Clone)]
pub struct ExistingImageFlow {
    pub recognized: RecognizedText,
    pub detected_type: DocumentType,
    pub processed: ProcessedDocument,
}

/// SDK context object: collaborators and configuration wired once by the
/// host and shared across calls. Replaces the singleton of earlier
/// incarnations; "initialize once, use many times" is kept through the
/// initialization flag, which entry points check but never mutate.
///
/// Processing calls (`process_*`) always return an envelope, even when the
/// SDK is uninitialized. Capture-style calls return `Result` because
/// capture is a precondition rather than a data-producing step.
pub struct Sdk<S, R, M> {
    coordinator: CaptureCoordinator<S, R>,
    processor: DocumentProcessor<M>,
    existing_image_detector: KeywordDetector,
    config: OcrConfig,
    initialized: AtomicBool,
}

impl<S, R, M> Sdk<S, R, M>
where
    S: DocumentScanner,
    R: TextRecognizer,
    M: GenerativeModel,
{
    pub fn new(scanner: S, recognizer: R, model: M, config: OcrConfig) -> Self {
        Self {
            coordinator: CaptureCoordinator::new(scanner, recognizer),
            processor: DocumentProcessor::new(model, config.clone()),
            existing_image_detector: KeywordDetector::existing_image_profile(),
            config,
            initialized: AtomicBool::new(false),
        }
    }

    /// Validate regional compliance and mark the SDK ready. Idempotent:
    /// repeat calls on an initialized SDK are no-ops.
    pub fn initialize(&self) -> Result<(), SdkError> {
        if self.initialized.load(Ordering::SeqCst) {
            debug!("SDK already initialized");
            return Ok(());
        }
        if !self.config.is_regionally_compliant() {
            return Err(SdkError::RegionalCompliance);
        }
        self.initialized.store(true, Ordering::SeqCst);
        info!(version = SDK_VERSION, region = %self.config.region, "SDK initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Clear initialization state (mainly for tests and host teardown).
    pub fn reset(&self) {
        info!("resetting SDK state");
        self.initialized.store(false, Ordering::SeqCst);
    }

    pub fn coordinator(&self) -> &CaptureCoordinator<S, R> {
        &self.coordinator
    }

    fn ensure_initialized(&self) -> Result<(), SdkError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(SdkError::NotInitialized)
        }
    }

    // ── Processing entry points (envelope contract) ───────────────────────────

    pub async fn process_cheque(
        &self,
        image: &ImageLocator,
        options: &ProcessingOptions,
    ) -> Outcome<ChequeRecord> {
        if let Err(e) = self.ensure_initialized() {
            return Outcome::fail(e.to_string());
        }
        self.processor.process_cheque(image, options).await
    }

    pub async fn process_enach(
        &self,
        image: &ImageLocator,
        options: &ProcessingOptions,
    ) -> Outcome<ENachRecord> {
        if let Err(e) = self.ensure_initialized() {
            return Outcome::fail(e.to_string());
        }
        self.processor.process_enach(image, options).await
    }

    /// Run recognition and type detection on an already-captured image,
    /// then process it. Pass a concrete `document_type` to skip detection;
    /// `None` auto-detects with the reduced keyword profile.
    pub async fn process_existing_image(
        &self,
        image: &ImageLocator,
        document_type: Option<DocumentType>,
        options: &ProcessingOptions,
    ) -> Result<ExistingImageFlow, SdkError> {
        self.ensure_initialized()?;

        let recognized = self.coordinator.recognizer().recognize(image).await?;
        let detected_type = match document_type {
            Some(requested) => requested,
            None => self.existing_image_detector.detect(&recognized.full_text),
        };
        info!(%detected_type, "processing existing image");

        let processed = self.processor.process(image, detected_type, options).await;
        Ok(ExistingImageFlow { recognized, detected_type, processed })
    }

    // ── Capture entry points (Result contract) ────────────────────────────────

    pub async fn open_document_scanner(
        &self,
        options: &CaptureOptions,
    ) -> Result<DocumentScan, SdkError> {
        self.ensure_initialized()?;
        Ok(self
            .coordinator
            .scanner()
            .open_scanner(options)
            .await
            .map_err(CaptureError::Scan)?)
    }

    /// Gallery-only convenience: the scanner in its plain mode with gallery
    /// import enabled.
    pub async fn open_image_picker(&self) -> Result<DocumentScan, SdkError> {
        self.open_document_scanner(&CaptureOptions {
            enable_gallery_import: true,
            scanner_mode: ScannerMode::Base,
            auto_detect_document_type: false,
        })
        .await
    }

    pub async fn recognize_text_from_image(
        &self,
        image: &ImageLocator,
    ) -> Result<RecognizedText, SdkError> {
        self.ensure_initialized()?;
        Ok(self.coordinator.recognizer().recognize(image).await?)
    }

    pub async fn capture_cheque(
        &self,
        camera: &CaptureOptions,
        processing: &ProcessingOptions,
    ) -> Result<CaptureFlow<ChequeRecord>, SdkError> {
        self.ensure_initialized()?;
        let started = Instant::now();

        let capture = self.capture_with_detection(camera).await?;
        self.warn_on_mismatch(&capture, DocumentType::Cheque);

        let image = self.first_page_image(&capture)?;
        let outcome = self.processor.process_cheque(&image, processing).await;

        Ok(CaptureFlow {
            capture,
            total_time_ms: started.elapsed().as_millis() as u64,
            outcome,
        })
    }

    pub async fn capture_enach(
        &self,
        camera: &CaptureOptions,
        processing: &ProcessingOptions,
    ) -> Result<CaptureFlow<ENachRecord>, SdkError> {
        self.ensure_initialized()?;
        let started = Instant::now();

        let capture = self.capture_with_detection(camera).await?;
        self.warn_on_mismatch(&capture, DocumentType::Enach);

        let image = self.first_page_image(&capture)?;
        let outcome = self.processor.process_enach(&image, processing).await;

        Ok(CaptureFlow {
            capture,
            total_time_ms: started.elapsed().as_millis() as u64,
            outcome,
        })
    }

    /// Capture any document, auto-detect its type, and process it
    /// accordingly. Detection failure is not fatal: `Unknown` documents go
    /// through the cheque flow.
    pub async fn capture_document(
        &self,
        camera: &CaptureOptions,
        processing: &ProcessingOptions,
    ) -> Result<DocumentCaptureFlow, SdkError> {
        self.ensure_initialized()?;
        let started = Instant::now();

        let capture = self.capture_with_detection(camera).await?;
        let document_type = capture.detected_type.unwrap_or(DocumentType::Unknown);

        let image = self.first_page_image(&capture)?;
        let processed = self.processor.process(&image, document_type, processing).await;

        Ok(DocumentCaptureFlow {
            capture,
            total_time_ms: started.elapsed().as_millis() as u64,
            document_type,
            processed,
        })
    }

    // ── Introspection ─────────────────────────────────────────────────────────

    pub fn info(&self) -> SdkInfo {
        SdkInfo {
            version: SDK_VERSION.to_string(),
            initialized: self.is_initialized(),
            regional_compliance: self.config.is_regionally_compliant(),
            supported_documents: vec![
                "Indian Bank Cheques".to_string(),
                "e-NACH Mandate Forms".to_string(),
            ],
            scanner_modes: vec![
                ScannerMode::Base,
                ScannerMode::BaseWithFilter,
                ScannerMode::Full,
            ],
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    async fn capture_with_detection(
        &self,
        camera: &CaptureOptions,
    ) -> Result<DocumentCapture, SdkError> {
        let options = CaptureOptions { auto_detect_document_type: true, ..camera.clone() };
        Ok(self.coordinator.capture_document(&options).await?)
    }

    fn warn_on_mismatch(&self, capture: &DocumentCapture, expected: DocumentType) {
        if let Some(detected) = capture.detected_type {
            if detected != expected && detected != DocumentType::Unknown {
                warn!(%detected, %expected, "captured document does not look like the expected type");
            }
        }
    }

    fn first_page_image(&self, capture: &DocumentCapture) -> Result<ImageLocator, SdkError> {
        capture
            .first_page()
            .map(|page| page.image.clone())
            .ok_or(SdkError::Capture(CaptureError::Empty))
    }
}
