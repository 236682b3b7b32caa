pub mod cheque;
pub mod config;
pub mod document;
pub mod enach;
pub mod envelope;
pub mod locator;
pub mod options;

pub use cheque::ChequeRecord;
pub use config::{ConfigError, OcrConfig, COMPLIANT_REGION};
pub use document::{DocumentType, ScannerMode};
pub use enach::ENachRecord;
pub use envelope::Outcome;
pub use locator::ImageLocator;
pub use options::{CaptureOptions, ProcessingOptions};
