use std::fmt;
use std::time::Instant;

use tracing::{debug, info, warn};

use patra_core::{
    ChequeRecord, DocumentType, ENachRecord, ImageLocator, OcrConfig, Outcome,
    ProcessingOptions,
};

use crate::extract::FieldExtractor;
use crate::model::GenerativeModel;
use crate::normalize::{self, NormalizedImage, NormalizeError};
use crate::{fraud, validate};

/// Stages of a single document submission, in order. A stage failure
/// short-circuits the remainder and surfaces as a failure envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Capturing,
    Recognizing,
    Extracting,
    Parsing,
    Validating,
    FraudChecking,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Capturing => write!(f, "capturing"),
            Stage::Recognizing => write!(f, "recognizing"),
            Stage::Extracting => write!(f, "extracting"),
            Stage::Parsing => write!(f, "parsing"),
            Stage::Validating => write!(f, "validating"),
            Stage::FraudChecking => write!(f, "fraud_checking"),
        }
    }
}

/// Envelope for a run whose document type was decided at runtime.
#[derive(Debug, Clone)]
pub enum ProcessedDocument {
    Cheque(Outcome<ChequeRecord>),
    Enach(Outcome<ENachRecord>),
}

impl ProcessedDocument {
    pub fn is_success(&self) -> bool {
        match self {
            ProcessedDocument::Cheque(outcome) => outcome.success,
            ProcessedDocument::Enach(outcome) => outcome.success,
        }
    }

    /// The type this run was processed as (never `Unknown`).
    pub fn processed_as(&self) -> DocumentType {
        match self {
            ProcessedDocument::Cheque(_) => DocumentType::Cheque,
            ProcessedDocument::Enach(_) => DocumentType::Enach,
        }
    }
}

/// Composes normalization, AI field extraction, validation, and fraud
/// signals for one document submission. Stages run strictly sequentially;
/// concurrent submissions share nothing but the processor itself.
pub struct DocumentProcessor<M> {
    extractor: FieldExtractor<M>,
    config: OcrConfig,
}

impl<M: GenerativeModel> DocumentProcessor<M> {
    pub fn new(model: M, config: OcrConfig) -> Self {
        Self { extractor: FieldExtractor::new(model), config }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    async fn normalized(
        &self,
        image: &ImageLocator,
        options: &ProcessingOptions,
    ) -> Result<NormalizedImage, NormalizeError> {
        // With preprocessing off the source resolution goes through unchanged.
        let max_dimension = if options.enable_preprocessing {
            self.config.max_image_dimension
        } else {
            u32::MAX
        };
        normalize::normalize(image, max_dimension).await
    }

    /// Process a cheque image end to end. Failures of any stage come back
    /// as a failure envelope; validation findings and fraud indicators are
    /// data on the success envelope, never errors.
    pub async fn process_cheque(
        &self,
        image: &ImageLocator,
        options: &ProcessingOptions,
    ) -> Outcome<ChequeRecord> {
        info!(%image, "processing cheque document");
        let started = Instant::now();

        debug!(stage = %Stage::Extracting, "normalizing image payload");
        let payload = match self.normalized(image, options).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(stage = %Stage::Extracting, error = %e, "cheque processing failed");
                return Outcome::fail(e.to_string());
            }
        };

        let mut record = match self.extractor.extract_cheque(&payload, options.timeout()).await {
            Ok(record) => record,
            Err(e) => {
                warn!(stage = %Stage::Parsing, error = %e, "cheque processing failed");
                return Outcome::fail(e.to_string());
            }
        };
        record.processing_time_ms = started.elapsed().as_millis() as u64;

        let validation_errors = if options.enable_validation {
            debug!(stage = %Stage::Validating, "validating cheque fields");
            validate::validate_cheque(&record)
        } else {
            Vec::new()
        };

        if options.enable_fraud_detection {
            debug!(stage = %Stage::FraudChecking, "running fraud heuristics");
            // Local findings are appended after the model's; no dedup.
            record.fraud_indicators.extend(fraud::detect(&record));
        }

        if !record.fraud_indicators.is_empty() {
            warn!(indicators = record.fraud_indicators.len(), "fraud indicators present");
        }
        info!(
            elapsed_ms = record.processing_time_ms,
            confidence = record.confidence,
            "cheque processed",
        );
        Outcome::ok_with_validation(record, validation_errors)
    }

    /// Process an e-NACH mandate image end to end. No fraud stage; the
    /// mandate flow carries validation findings only.
    pub async fn process_enach(
        &self,
        image: &ImageLocator,
        options: &ProcessingOptions,
    ) -> Outcome<ENachRecord> {
        info!(%image, "processing e-NACH document");
        let started = Instant::now();

        debug!(stage = %Stage::Extracting, "normalizing image payload");
        let payload = match self.normalized(image, options).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(stage = %Stage::Extracting, error = %e, "e-NACH processing failed");
                return Outcome::fail(e.to_string());
            }
        };

        let mut record = match self.extractor.extract_enach(&payload, options.timeout()).await {
            Ok(record) => record,
            Err(e) => {
                warn!(stage = %Stage::Parsing, error = %e, "e-NACH processing failed");
                return Outcome::fail(e.to_string());
            }
        };
        record.processing_time_ms = started.elapsed().as_millis() as u64;

        let validation_errors = if options.enable_validation {
            debug!(stage = %Stage::Validating, "validating mandate fields");
            validate::validate_enach(&record)
        } else {
            Vec::new()
        };

        info!(
            elapsed_ms = record.processing_time_ms,
            confidence = record.confidence,
            "e-NACH processed",
        );
        Outcome::ok_with_validation(record, validation_errors)
    }

    /// Dispatch on a runtime document type. `Unknown` falls back to
    /// cheque-style processing rather than dead-ending; the fallback is a
    /// recovery path, not a detection success.
    pub async fn process(
        &self,
        image: &ImageLocator,
        document_type: DocumentType,
        options: &ProcessingOptions,
    ) -> ProcessedDocument {
        match document_type {
            DocumentType::Enach => {
                ProcessedDocument::Enach(self.process_enach(image, options).await)
            }
            DocumentType::Cheque => {
                ProcessedDocument::Cheque(self.process_cheque(image, options).await)
            }
            DocumentType::Unknown => {
                warn!("unknown document type, defaulting to cheque processing");
                ProcessedDocument::Cheque(self.process_cheque(image, options).await)
            }
        }
    }
}
