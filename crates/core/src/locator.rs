use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Opaque reference to a source image: a filesystem path or `file://` URI
/// handed over by the capture collaborator or the host application.
/// Consumed once per pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageLocator(String);

impl ImageLocator {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem view of the locator, with any `file://` scheme stripped.
    pub fn as_path(&self) -> &Path {
        Path::new(self.0.strip_prefix("file://").unwrap_or(&self.0))
    }
}

impl From<&str> for ImageLocator {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for ImageLocator {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl fmt::Display for ImageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
