use serde::{Deserialize, Serialize};

/// Fully parsed representation of an Indian bank cheque.
///
/// Every string field defaults to the empty string when the model response
/// omits it; consumers can rely on fields never being absent. `confidence`
/// is a 0–100 completeness score and `processing_time_ms` covers the
/// extraction phase only (not capture).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChequeRecord {
    pub bank_name: String,
    pub branch_address: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub cheque_number: String,
    pub micr_code: String,
    pub date: String,
    pub amount_in_words: String,
    pub amount_in_numbers: String,
    pub pay_to_name: String,
    pub signature_present: bool,
    pub document_quality: String,
    pub document_type: String,
    pub authorization_present: bool,
    pub fraud_indicators: Vec<String>,
    pub confidence: u8,
    #[serde(rename = "processingTime")]
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_has_empty_strings_not_missing_fields() {
        let record = ChequeRecord::default();
        assert_eq!(record.bank_name, "");
        assert_eq!(record.micr_code, "");
        assert!(!record.signature_present);
        assert!(record.fraud_indicators.is_empty());
        assert_eq!(record.confidence, 0);
    }

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let record = ChequeRecord {
            bank_name: "HDFC Bank".into(),
            processing_time_ms: 1200,
            ..ChequeRecord::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["bankName"], "HDFC Bank");
        assert_eq!(json["processingTime"], 1200);
        assert!(json.get("bank_name").is_none());
    }
}
