pub mod capture;
pub mod detect;
pub mod extract;
pub mod fraud;
pub mod model;
pub mod normalize;
pub mod process;
pub mod recognizer;
pub mod scanner;
pub mod validate;

pub use capture::{CaptureCoordinator, CaptureError, DocumentCapture};
pub use detect::KeywordDetector;
pub use extract::{ExtractError, FieldExtractor};
pub use model::{GenerativeModel, MockModel, ModelError};
pub use normalize::{normalize, NormalizeError, NormalizedImage, DEFAULT_MAX_DIMENSION};
pub use process::{DocumentProcessor, ProcessedDocument, Stage};
pub use recognizer::{
    MockRecognizer, RecognizeError, RecognizedText, TextBlock, TextRecognizer,
};
pub use scanner::{DocumentScan, DocumentScanner, MockScanner, ScanError, ScanPage};
