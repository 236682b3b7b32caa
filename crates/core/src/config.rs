use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only model region permitted for Indian financial documents.
pub const COMPLIANT_REGION: &str = "asia-south1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Generation and preprocessing settings shared by every pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OcrConfig {
    pub region: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
    pub max_image_dimension: u32,
    pub enable_fraud_detection: bool,
    pub enable_cross_validation: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            region: COMPLIANT_REGION.to_string(),
            temperature: 0.1,
            max_output_tokens: 4096,
            response_mime_type: "application/json".to_string(),
            max_image_dimension: 1024,
            enable_fraud_detection: true,
            enable_cross_validation: true,
        }
    }
}

impl OcrConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    /// Data-residency check: only `asia-south1` passes.
    pub fn is_regionally_compliant(&self) -> bool {
        self.region == COMPLIANT_REGION
    }
}
