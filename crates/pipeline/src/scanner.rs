use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use patra_core::{CaptureOptions, ImageLocator};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Capture cancelled by user")]
    Cancelled,
    #[error("Document scanner unavailable on this platform")]
    Unavailable,
    #[error("Document capture failed: {0}")]
    Failed(String),
}

/// One captured page. Multi-page documents come back in capture order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage {
    pub image: ImageLocator,
}

/// Result of a completed scanner session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentScan {
    pub pages: Vec<ScanPage>,
}

impl DocumentScan {
    pub fn first_page(&self) -> Option<&ScanPage> {
        self.pages.first()
    }
}

/// Abstraction over the native camera / gallery capture collaborator.
/// Implementations drive the platform scanner UI and hand back locators for
/// the captured pages.
#[async_trait]
pub trait DocumentScanner: Send + Sync {
    async fn open_scanner(&self, options: &CaptureOptions) -> Result<DocumentScan, ScanError>;
}

// ── Mock scanner (used for tests) ─────────────────────────────────────────────

enum MockScanOutcome {
    Pages(Vec<ScanPage>),
    Cancelled,
    Unavailable,
}

/// Returns a preset scan result and records the options of every call, so
/// tests can assert what the facade actually requested.
pub struct MockScanner {
    outcome: MockScanOutcome,
    requests: Mutex<Vec<CaptureOptions>>,
}

impl MockScanner {
    pub fn with_page(uri: impl Into<String>) -> Self {
        Self::with_pages(vec![ScanPage { image: ImageLocator::new(uri) }])
    }

    pub fn with_pages(pages: Vec<ScanPage>) -> Self {
        Self { outcome: MockScanOutcome::Pages(pages), requests: Mutex::new(Vec::new()) }
    }

    /// A scan session the user dismissed.
    pub fn cancelled() -> Self {
        Self { outcome: MockScanOutcome::Cancelled, requests: Mutex::new(Vec::new()) }
    }

    pub fn unavailable() -> Self {
        Self { outcome: MockScanOutcome::Unavailable, requests: Mutex::new(Vec::new()) }
    }

    /// A "successful" session that produced no pages.
    pub fn empty() -> Self {
        Self::with_pages(Vec::new())
    }

    pub fn last_options(&self) -> Option<CaptureOptions> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DocumentScanner for MockScanner {
    async fn open_scanner(&self, options: &CaptureOptions) -> Result<DocumentScan, ScanError> {
        self.requests.lock().unwrap().push(options.clone());
        match &self.outcome {
            MockScanOutcome::Pages(pages) => Ok(DocumentScan { pages: pages.clone() }),
            MockScanOutcome::Cancelled => Err(ScanError::Cancelled),
            MockScanOutcome::Unavailable => Err(ScanError::Unavailable),
        }
    }
}
