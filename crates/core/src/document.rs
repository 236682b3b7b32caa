use serde::{Deserialize, Serialize};

/// Kind of financial document the pipeline knows how to process.
/// `Unknown` is a valid detection result, not an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Cheque,
    Enach,
    Unknown,
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::Cheque => write!(f, "cheque"),
            DocumentType::Enach => write!(f, "enach"),
            DocumentType::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cheque" => Ok(DocumentType::Cheque),
            "enach" => Ok(DocumentType::Enach),
            "unknown" => Ok(DocumentType::Unknown),
            other => Err(format!("Unknown document type: '{other}'")),
        }
    }
}

/// Scanner UI mode requested from the capture collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScannerMode {
    Base,
    BaseWithFilter,
    #[default]
    Full,
}

impl std::fmt::Display for ScannerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScannerMode::Base => write!(f, "base"),
            ScannerMode::BaseWithFilter => write!(f, "base_with_filter"),
            ScannerMode::Full => write!(f, "full"),
        }
    }
}

impl std::str::FromStr for ScannerMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(ScannerMode::Base),
            "base_with_filter" => Ok(ScannerMode::BaseWithFilter),
            "full" => Ok(ScannerMode::Full),
            other => Err(format!("Unknown scanner mode: '{other}'")),
        }
    }
}
