use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use patra_core::ImageLocator;

#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("Text recognition engine error: {0}")]
    Engine(String),
}

/// Rectangle in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Word-level element inside a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextElement {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    #[serde(default)]
    pub elements: Vec<TextElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub lines: Vec<TextLine>,
}

/// Hierarchical recognition output: full concatenated text plus ordered
/// blocks, lines, and word elements. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedText {
    pub full_text: String,
    #[serde(rename = "textBlocks")]
    pub blocks: Vec<TextBlock>,
}

impl RecognizedText {
    /// Builds a single-block structure from plain text, splitting lines and
    /// whitespace-delimited word elements.
    pub fn from_text(text: impl Into<String>) -> Self {
        let full_text = text.into();
        let lines = full_text
            .lines()
            .map(|line| TextLine {
                text: line.to_string(),
                elements: line
                    .split_whitespace()
                    .map(|word| TextElement { text: word.to_string() })
                    .collect(),
            })
            .collect();
        let blocks =
            vec![TextBlock { text: full_text.clone(), bounding_box: None, lines }];
        Self { full_text, blocks }
    }
}

/// Abstraction over the on-device text-recognition collaborator.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &ImageLocator) -> Result<RecognizedText, RecognizeError>;
}

// ── Mock recognizer (used for tests) ──────────────────────────────────────────

/// Returns preset text regardless of the image handed in.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl TextRecognizer for MockRecognizer {
    async fn recognize(&self, _image: &ImageLocator) -> Result<RecognizedText, RecognizeError> {
        Ok(RecognizedText::from_text(self.text.clone()))
    }
}

/// Always fails with an engine error, for failure-path tests.
pub struct FailingRecognizer;

#[async_trait]
impl TextRecognizer for FailingRecognizer {
    async fn recognize(&self, _image: &ImageLocator) -> Result<RecognizedText, RecognizeError> {
        Err(RecognizeError::Engine("recognizer offline".to_string()))
    }
}
