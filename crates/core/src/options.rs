use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::document::ScannerMode;

/// Per-call knobs for the processing pipeline. All stages default to on;
/// the timeout applies to the model call only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingOptions {
    pub enable_preprocessing: bool,
    pub enable_validation: bool,
    pub enable_fraud_detection: bool,
    #[serde(rename = "timeout")]
    pub timeout_ms: Option<u64>,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            enable_preprocessing: true,
            enable_validation: true,
            enable_fraud_detection: true,
            timeout_ms: Some(30_000),
        }
    }
}

impl ProcessingOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Options forwarded to the capture collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureOptions {
    pub enable_gallery_import: bool,
    pub scanner_mode: ScannerMode,
    pub auto_detect_document_type: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            enable_gallery_import: true,
            scanner_mode: ScannerMode::Full,
            auto_detect_document_type: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_defaults_enable_everything_with_30s_timeout() {
        let opts = ProcessingOptions::default();
        assert!(opts.enable_preprocessing);
        assert!(opts.enable_validation);
        assert!(opts.enable_fraud_detection);
        assert_eq!(opts.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn timeout_can_be_disabled() {
        let opts = ProcessingOptions { timeout_ms: None, ..ProcessingOptions::default() };
        assert_eq!(opts.timeout(), None);
    }

    #[test]
    fn capture_defaults_use_full_scanner_with_gallery() {
        let opts = CaptureOptions::default();
        assert!(opts.enable_gallery_import);
        assert_eq!(opts.scanner_mode, ScannerMode::Full);
        assert!(!opts.auto_detect_document_type);
    }

    #[test]
    fn deserializes_partial_json() {
        let opts: ProcessingOptions =
            serde_json::from_str(r#"{"enableFraudDetection": false}"#).unwrap();
        assert!(!opts.enable_fraud_detection);
        assert!(opts.enable_validation);
    }
}
