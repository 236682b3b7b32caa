use serde::{Deserialize, Serialize};

/// Fully parsed representation of an e-NACH mandate form.
///
/// Same conventions as [`crate::ChequeRecord`]: string fields are never
/// absent, booleans default to false.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ENachRecord {
    pub utility_name: String,
    pub utility_code: String,
    pub customer_ref_number: String,
    pub account_holder_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_type: String,
    pub max_amount: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: String,
    pub primary_account_ref: String,
    pub sponsor_bank_name: String,
    pub umrn: String,
    pub mandate_type: String,
    pub auth_mode: String,
    pub customer_signature: bool,
    pub date_of_mandate: String,
    pub confidence: u8,
    #[serde(rename = "processingTime")]
    pub processing_time_ms: u64,
}
