use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use patra_core::{ChequeRecord, DocumentType, ENachRecord};

use crate::model::{GenerativeModel, ModelError};
use crate::normalize::NormalizedImage;

/// Neutral score reported when the response cannot be parsed at all.
/// Not a measured value; callers must not treat it as meaningful.
const FALLBACK_CONFIDENCE: u8 = 50;

// ── Prompts ───────────────────────────────────────────────────────────────────
// Prompts are data: fixed per document type and never parameterized by
// recognized text or other user-controlled content, so OCR output cannot
// inject instructions.

pub const CHEQUE_PROMPT: &str = r#"Extract cheque details from this Indian bank cheque image.
Return JSON with exact keys:
{
  "bank_name": "string",
  "branchAddress": "string",
  "ifsc_code": "string",
  "account_holder_name": "string",
  "account_number": "string",
  "chequeNumber": "string",
  "micr_code": "string",
  "date": "DD/MM/YYYY",
  "amountInWords": "string",
  "amountInNumbers": "string",
  "payToName": "string",
  "signature_present": "boolean",
  "document_quality": "string",
  "document_type": "string",
  "authorizationPresent": "boolean",
  "fraud_indicators": ["array of potential fraud indicators"]
}"#;

pub const ENACH_PROMPT: &str = r#"Extract e-NACH mandate details from this Indian e-NACH form.
Return JSON with exact keys:
{
  "utilityName": "string",
  "utilityCode": "string",
  "customerRefNumber": "string",
  "accountHolderName": "string",
  "bankName": "string",
  "accountNumber": "string",
  "ifscCode": "string",
  "accountType": "string",
  "maxAmount": "string",
  "frequency": "string",
  "startDate": "DD/MM/YYYY",
  "endDate": "DD/MM/YYYY",
  "primaryAccountRef": "string",
  "sponsorBankName": "string",
  "umrn": "string",
  "mandateType": "string",
  "authMode": "string",
  "customerSignature": "boolean",
  "dateOfMandate": "DD/MM/YYYY"
}"#;

/// Fixed-schema prompt for the given document type. `Unknown` gets the
/// cheque prompt; the orchestrator resolves the fallback before extraction
/// and this keeps the mapping total.
pub fn prompt_for(document_type: DocumentType) -> &'static str {
    match document_type {
        DocumentType::Enach => ENACH_PROMPT,
        DocumentType::Cheque | DocumentType::Unknown => CHEQUE_PROMPT,
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Model call failed: {0}")]
    Model(#[from] ModelError),
    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Failed to parse model response: {0}")]
    ResponseParse(String),
}

// ── Response parsing ──────────────────────────────────────────────────────────

/// Substring between the first `{` and the last `}`, inclusive. Tolerates
/// prose wrapped around the JSON payload; anything without both delimiters
/// is a parse failure, never an empty record.
pub fn extract_json(response: &str) -> Result<&str, ExtractError> {
    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(&response[start..=end]),
        _ => Err(ExtractError::ResponseParse(
            "no JSON object delimiters in response".to_string(),
        )),
    }
}

fn parse_object(response: &str) -> Result<Value, ExtractError> {
    let json = extract_json(response)?;
    serde_json::from_str(json).map_err(|e| ExtractError::ResponseParse(e.to_string()))
}

fn text_field(data: &Value, key: &str) -> String {
    data.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

/// Coercion table: boolean `true` and the literal string "true" map to
/// true; everything else, including absence, maps to false.
fn bool_field(data: &Value, key: &str) -> bool {
    match data.get(key) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text == "true",
        _ => false,
    }
}

/// Array of strings, keeping only entries with non-empty trimmed content.
fn string_list_field(data: &Value, key: &str) -> Vec<String> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Decode a cheque response into a record. Every field falls back to its
/// default when missing or of an unexpected type; `confidence` and
/// `processing_time_ms` are filled in by the caller.
pub fn parse_cheque_response(response: &str) -> Result<ChequeRecord, ExtractError> {
    let data = parse_object(response)?;
    Ok(ChequeRecord {
        bank_name: text_field(&data, "bank_name"),
        branch_address: text_field(&data, "branchAddress"),
        ifsc_code: text_field(&data, "ifsc_code"),
        account_holder_name: text_field(&data, "account_holder_name"),
        account_number: text_field(&data, "account_number"),
        cheque_number: text_field(&data, "chequeNumber"),
        micr_code: text_field(&data, "micr_code"),
        date: text_field(&data, "date"),
        amount_in_words: text_field(&data, "amountInWords"),
        amount_in_numbers: text_field(&data, "amountInNumbers"),
        pay_to_name: text_field(&data, "payToName"),
        signature_present: bool_field(&data, "signature_present"),
        document_quality: text_field(&data, "document_quality"),
        document_type: text_field(&data, "document_type"),
        authorization_present: bool_field(&data, "authorizationPresent"),
        fraud_indicators: string_list_field(&data, "fraud_indicators"),
        confidence: 0,
        processing_time_ms: 0,
    })
}

pub fn parse_enach_response(response: &str) -> Result<ENachRecord, ExtractError> {
    let data = parse_object(response)?;
    Ok(ENachRecord {
        utility_name: text_field(&data, "utilityName"),
        utility_code: text_field(&data, "utilityCode"),
        customer_ref_number: text_field(&data, "customerRefNumber"),
        account_holder_name: text_field(&data, "accountHolderName"),
        bank_name: text_field(&data, "bankName"),
        account_number: text_field(&data, "accountNumber"),
        ifsc_code: text_field(&data, "ifscCode"),
        account_type: text_field(&data, "accountType"),
        max_amount: text_field(&data, "maxAmount"),
        frequency: text_field(&data, "frequency"),
        start_date: text_field(&data, "startDate"),
        end_date: text_field(&data, "endDate"),
        primary_account_ref: text_field(&data, "primaryAccountRef"),
        sponsor_bank_name: text_field(&data, "sponsorBankName"),
        umrn: text_field(&data, "umrn"),
        mandate_type: text_field(&data, "mandateType"),
        auth_mode: text_field(&data, "authMode"),
        customer_signature: bool_field(&data, "customerSignature"),
        date_of_mandate: text_field(&data, "dateOfMandate"),
        confidence: 0,
        processing_time_ms: 0,
    })
}

// ── Confidence ────────────────────────────────────────────────────────────────

/// Completeness score over the parsed response object: the share of keys
/// holding a populated value, scaled to 0-100 and rounded. Unparseable
/// responses score the neutral fallback.
pub fn calculate_confidence(response: &str) -> u8 {
    let Ok(data) = parse_object(response) else {
        return FALLBACK_CONFIDENCE;
    };
    let Some(object) = data.as_object() else {
        return FALLBACK_CONFIDENCE;
    };
    if object.is_empty() {
        return 0;
    }
    let populated = object.values().filter(|value| is_populated(value)).count();
    ((populated as f64 / object.len() as f64) * 100.0).round() as u8
}

fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

// ── Extraction service ────────────────────────────────────────────────────────

/// Builds the document-type prompt, invokes the generative model, and
/// decodes the response into a typed record.
pub struct FieldExtractor<M> {
    model: M,
}

impl<M: GenerativeModel> FieldExtractor<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Raw model round-trip with the optional timeout applied to the call.
    pub async fn request(
        &self,
        document_type: DocumentType,
        image: &NormalizedImage,
        timeout: Option<Duration>,
    ) -> Result<String, ExtractError> {
        let prompt = prompt_for(document_type);
        debug!(%document_type, payload_bytes = image.payload_len(), "requesting field extraction");

        let call = self.model.generate(prompt, image);
        let response = match timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ExtractError::Timeout(limit))??,
            None => call.await?,
        };
        Ok(response)
    }

    pub async fn extract_cheque(
        &self,
        image: &NormalizedImage,
        timeout: Option<Duration>,
    ) -> Result<ChequeRecord, ExtractError> {
        let response = self.request(DocumentType::Cheque, image, timeout).await?;
        let mut record = parse_cheque_response(&response)?;
        record.confidence = calculate_confidence(&response);
        Ok(record)
    }

    pub async fn extract_enach(
        &self,
        image: &NormalizedImage,
        timeout: Option<Duration>,
    ) -> Result<ENachRecord, ExtractError> {
        let response = self.request(DocumentType::Enach, image, timeout).await?;
        let mut record = parse_enach_response(&response)?;
        record.confidence = calculate_confidence(&response);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MockModel;
    use async_trait::async_trait;

    const WRAPPED_RESPONSE: &str = r#"Here is the result: {"bank_name":"HDFC Bank","ifsc_code":"HDFC0001234","date":"15/08/2024","chequeNumber":"001234","account_number":"1234567890","account_holder_name":"John Doe"} Thanks."#;

    // ── JSON extraction ───────────────────────────────────────────────────────

    #[test]
    fn extract_json_strips_surrounding_prose() {
        let json = extract_json(WRAPPED_RESPONSE).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        serde_json::from_str::<Value>(json).unwrap();
    }

    #[test]
    fn extract_json_is_idempotent_on_delimited_text() {
        let first = extract_json(WRAPPED_RESPONSE).unwrap();
        let second = extract_json(first).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            parse_cheque_response(first).unwrap(),
            parse_cheque_response(second).unwrap()
        );
    }

    #[test]
    fn missing_braces_fail_parse() {
        assert!(matches!(
            extract_json("no json here at all"),
            Err(ExtractError::ResponseParse(_))
        ));
        assert!(matches!(extract_json("only open {"), Err(ExtractError::ResponseParse(_))));
        assert!(matches!(extract_json("} backwards {"), Err(ExtractError::ResponseParse(_))));
    }

    #[test]
    fn invalid_json_between_braces_fails_parse() {
        assert!(matches!(
            parse_cheque_response("{not valid json}"),
            Err(ExtractError::ResponseParse(_))
        ));
    }

    // ── Field mapping ─────────────────────────────────────────────────────────

    #[test]
    fn parse_cheque_maps_known_keys_and_defaults_the_rest() {
        let record = parse_cheque_response(WRAPPED_RESPONSE).unwrap();
        assert_eq!(record.bank_name, "HDFC Bank");
        assert_eq!(record.ifsc_code, "HDFC0001234");
        assert_eq!(record.cheque_number, "001234");
        assert_eq!(record.account_holder_name, "John Doe");
        // Absent fields come back empty, never missing.
        assert_eq!(record.micr_code, "");
        assert_eq!(record.amount_in_words, "");
        assert!(!record.signature_present);
        assert!(record.fraud_indicators.is_empty());
    }

    #[test]
    fn bool_coercion_accepts_native_and_literal_true_only() {
        let parse = |raw: &str| parse_cheque_response(raw).unwrap().signature_present;
        assert!(parse(r#"{"signature_present": true}"#));
        assert!(parse(r#"{"signature_present": "true"}"#));
        assert!(!parse(r#"{"signature_present": false}"#));
        assert!(!parse(r#"{"signature_present": "false"}"#));
        assert!(!parse(r#"{"signature_present": "yes"}"#));
        assert!(!parse(r#"{"signature_present": 1}"#));
        assert!(!parse(r#"{}"#));
    }

    #[test]
    fn unexpected_types_fall_back_to_empty_string() {
        let record = parse_cheque_response(r#"{"bank_name": 42, "date": null}"#).unwrap();
        assert_eq!(record.bank_name, "");
        assert_eq!(record.date, "");
    }

    #[test]
    fn fraud_indicators_keep_only_non_blank_strings() {
        let record = parse_cheque_response(
            r#"{"fraud_indicators": ["Altered date", "   ", "", 7, "Overwriting near amount"]}"#,
        )
        .unwrap();
        assert_eq!(record.fraud_indicators, vec!["Altered date", "Overwriting near amount"]);
    }

    #[test]
    fn parse_enach_maps_mandate_keys() {
        let response = r#"{"utilityName":"Tata Power","umrn":"HDFC7012345678901234","maxAmount":"5000","customerSignature":"true","frequency":"Monthly"}"#;
        let record = parse_enach_response(response).unwrap();
        assert_eq!(record.utility_name, "Tata Power");
        assert_eq!(record.umrn, "HDFC7012345678901234");
        assert_eq!(record.max_amount, "5000");
        assert!(record.customer_signature);
        assert_eq!(record.sponsor_bank_name, "");
    }

    // ── Confidence ────────────────────────────────────────────────────────────

    #[test]
    fn confidence_is_100_for_fully_populated_object() {
        let response = r#"{"a":"x","b":true,"c":["y"],"d":12}"#;
        assert_eq!(calculate_confidence(response), 100);
    }

    #[test]
    fn confidence_is_0_for_all_empty_object() {
        let response = r#"{"a":"","b":false,"c":[],"d":null}"#;
        assert_eq!(calculate_confidence(response), 0);
    }

    #[test]
    fn confidence_rounds_partial_population() {
        // 2 of 3 populated.
        assert_eq!(calculate_confidence(r#"{"a":"x","b":"y","c":""}"#), 67);
        // 1 of 3 populated.
        assert_eq!(calculate_confidence(r#"{"a":"x","b":"","c":""}"#), 33);
    }

    #[test]
    fn confidence_defaults_to_50_when_unparseable() {
        assert_eq!(calculate_confidence("no braces anywhere"), 50);
        assert_eq!(calculate_confidence("{broken"), 50);
    }

    #[test]
    fn confidence_is_0_for_empty_object() {
        assert_eq!(calculate_confidence("{}"), 0);
    }

    // ── Prompts ───────────────────────────────────────────────────────────────

    #[test]
    fn prompts_are_fixed_per_document_type() {
        assert_eq!(prompt_for(DocumentType::Cheque), CHEQUE_PROMPT);
        assert_eq!(prompt_for(DocumentType::Enach), ENACH_PROMPT);
        assert_eq!(prompt_for(DocumentType::Unknown), CHEQUE_PROMPT);
        assert!(CHEQUE_PROMPT.contains("\"micr_code\""));
        assert!(ENACH_PROMPT.contains("\"umrn\""));
    }

    // ── Service ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn extract_cheque_fills_confidence() {
        let extractor = FieldExtractor::new(MockModel::new(WRAPPED_RESPONSE));
        let image = NormalizedImage::connectivity_probe();
        let record = extractor.extract_cheque(&image, None).await.unwrap();
        assert_eq!(record.bank_name, "HDFC Bank");
        // All six returned keys are populated.
        assert_eq!(record.confidence, 100);
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let extractor = FieldExtractor::new(MockModel::failing("region unreachable"));
        let image = NormalizedImage::connectivity_probe();
        let err = extractor.extract_cheque(&image, None).await.unwrap_err();
        assert!(matches!(err, ExtractError::Model(_)));
    }

    struct StalledModel;

    #[async_trait]
    impl crate::model::GenerativeModel for StalledModel {
        async fn generate(
            &self,
            _prompt: &str,
            _image: &NormalizedImage,
        ) -> Result<String, crate::model::ModelError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn timeout_cuts_off_stalled_model() {
        let extractor = FieldExtractor::new(StalledModel);
        let image = NormalizedImage::connectivity_probe();
        let err = extractor
            .extract_cheque(&image, Some(Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Timeout(_)));
    }
}
