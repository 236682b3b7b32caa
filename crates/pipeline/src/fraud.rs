use std::str::FromStr;

use rust_decimal::Decimal;

use patra_core::ChequeRecord;

/// Amounts above one lakh rupees are flagged for manual review.
const HIGH_AMOUNT_THRESHOLD: i64 = 100_000;

/// Local fraud heuristics over a parsed cheque. Pure; rules run
/// independently and findings come back in rule order. The caller appends
/// them after any model-supplied indicators without deduplication, so the
/// same concern raised by both sources appears twice.
pub fn detect(record: &ChequeRecord) -> Vec<String> {
    let mut indicators = Vec::new();

    if !record.signature_present {
        indicators.push("No signature detected".to_string());
    }

    if record.document_quality.to_lowercase().contains("poor") {
        indicators.push("Poor document quality detected".to_string());
    }

    if let Some(amount) = parse_amount(&record.amount_in_numbers) {
        if amount > Decimal::from(HIGH_AMOUNT_THRESHOLD) {
            indicators.push("High amount transaction".to_string());
        }
    }

    let critical_fields = [
        &record.bank_name,
        &record.account_number,
        &record.ifsc_code,
        &record.account_holder_name,
        &record.date,
    ];
    let missing = critical_fields.iter().filter(|field| field.trim().is_empty()).count();
    if missing > 2 {
        indicators.push("Multiple critical fields missing".to_string());
    }

    indicators
}

/// Strips currency symbols and grouping separators, keeping digits and the
/// decimal point.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let clean: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    if clean.is_empty() {
        return None;
    }
    Decimal::from_str(&clean).ok()
}
