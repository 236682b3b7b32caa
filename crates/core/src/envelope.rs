use serde::{Deserialize, Serialize};

/// Result envelope handed back by every `process_*` entry point.
///
/// Invariants, enforced by the constructors: `success == true` implies
/// `data` is present and `error` absent; `success == false` implies `data`
/// is absent. Validation findings ride along on successful envelopes only
/// and an empty finding list collapses to `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
}

impl<T> Outcome<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None, validation_errors: None }
    }

    pub fn ok_with_validation(data: T, validation_errors: Vec<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            validation_errors: if validation_errors.is_empty() {
                None
            } else {
                Some(validation_errors)
            },
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()), validation_errors: None }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}
