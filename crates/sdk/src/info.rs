use serde::Serialize;

use patra_core::ScannerMode;

/// Capability and status snapshot for host applications.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SdkInfo {
    pub version: String,
    pub initialized: bool,
    pub regional_compliance: bool,
    pub supported_documents: Vec<String>,
    pub scanner_modes: Vec<ScannerMode>,
}
