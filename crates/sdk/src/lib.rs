//! SDK facade for turning photographs of Indian bank cheques and e-NACH
//! mandate forms into structured, validated records with fraud signals.
//!
//! The host wires three collaborators (a document scanner, an on-device
//! text recognizer, and a generative model) into an [`Sdk`] context object,
//! initializes it once, and then drives capture and processing through it:
//!
//! ```no_run
//! use patra::{Sdk, ProcessingOptions, OcrConfig, ImageLocator};
//! use patra::pipeline::model::MockModel;
//! use patra::pipeline::recognizer::MockRecognizer;
//! use patra::pipeline::scanner::MockScanner;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let sdk = Sdk::new(
//!     MockScanner::with_page("/captures/cheque.jpg"),
//!     MockRecognizer::new("PAY TO ..."),
//!     MockModel::new(r#"{"bank_name": "HDFC Bank"}"#),
//!     OcrConfig::default(),
//! );
//! sdk.initialize()?;
//!
//! let outcome = sdk
//!     .process_cheque(&ImageLocator::new("/captures/cheque.jpg"), &ProcessingOptions::default())
//!     .await;
//! if outcome.success {
//!     println!("{:?}", outcome.data);
//! }
//! # Ok(())
//! # }
//! ```

pub mod info;
pub mod sdk;

pub use info::SdkInfo;
pub use sdk::{
    CaptureFlow, DocumentCaptureFlow, ExistingImageFlow, Sdk, SdkError, SDK_VERSION,
};

pub use patra_core::{
    CaptureOptions, ChequeRecord, DocumentType, ENachRecord, ImageLocator, OcrConfig,
    Outcome, ProcessingOptions, ScannerMode,
};

/// Pipeline building blocks, re-exported for hosts implementing their own
/// collaborators.
pub use patra_pipeline as pipeline;
