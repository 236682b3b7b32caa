use thiserror::Error;
use tracing::{debug, info};

use patra_core::{CaptureOptions, DocumentType};

use crate::detect::KeywordDetector;
use crate::recognizer::{RecognizeError, RecognizedText, TextRecognizer};
use crate::scanner::{DocumentScan, DocumentScanner, ScanError, ScanPage};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("No pages captured")]
    Empty,
    #[error("Text recognition failed: {0}")]
    Recognition(#[from] RecognizeError),
}

/// Unified result of one capture session: the raw scan, the recognized
/// text for page 0, and the optional document-type guess.
#[derive(Debug, Clone)]
pub struct DocumentCapture {
    pub scan: DocumentScan,
    pub recognized: RecognizedText,
    pub detected_type: Option<DocumentType>,
}

impl DocumentCapture {
    pub fn first_page(&self) -> Option<&ScanPage> {
        self.scan.first_page()
    }
}

/// Drives the capture and text-recognition collaborators. Only the first
/// captured page is recognized; multi-page capture is out of scope.
pub struct CaptureCoordinator<S, R> {
    scanner: S,
    recognizer: R,
    detector: KeywordDetector,
}

impl<S: DocumentScanner, R: TextRecognizer> CaptureCoordinator<S, R> {
    pub fn new(scanner: S, recognizer: R) -> Self {
        Self { scanner, recognizer, detector: KeywordDetector::capture_profile() }
    }

    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    pub async fn capture_document(
        &self,
        options: &CaptureOptions,
    ) -> Result<DocumentCapture, CaptureError> {
        debug!(mode = %options.scanner_mode, gallery = options.enable_gallery_import, "opening document scanner");
        let scan = self.scanner.open_scanner(options).await?;
        let page = scan.first_page().ok_or(CaptureError::Empty)?;

        debug!(image = %page.image, "running text recognition on first page");
        let recognized = self.recognizer.recognize(&page.image).await?;

        let detected_type = options
            .auto_detect_document_type
            .then(|| self.detector.detect(&recognized.full_text));
        if let Some(document_type) = detected_type {
            info!(%document_type, blocks = recognized.blocks.len(), "document capture complete");
        }

        Ok(DocumentCapture { scan, recognized, detected_type })
    }
}
