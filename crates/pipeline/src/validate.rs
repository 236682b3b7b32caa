use std::sync::OnceLock;

use regex::Regex;

use patra_core::{ChequeRecord, ENachRecord};

// ── Compiled regex cache ──────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_ifsc, r"^[A-Z]{4}0[A-Z0-9]{6}$");
re!(re_date, r"^\d{2}/\d{2}/\d{4}$");
re!(re_micr, r"^\d{9}$");

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn is_valid_date(text: &str) -> bool {
    re_date().is_match(text)
}

/// Format and completeness rules for a parsed cheque. Pure: every rule
/// runs and every violation is reported, in rule order.
pub fn validate_cheque(record: &ChequeRecord) -> Vec<String> {
    let mut errors = Vec::new();

    if is_blank(&record.bank_name) {
        errors.push("Bank name is required".to_string());
    }
    if is_blank(&record.account_number) {
        errors.push("Account number is required".to_string());
    }
    if is_blank(&record.ifsc_code) {
        errors.push("IFSC code is required".to_string());
    } else if !re_ifsc().is_match(&record.ifsc_code) {
        errors.push("Invalid IFSC code format".to_string());
    }
    if is_blank(&record.cheque_number) {
        errors.push("Cheque number is required".to_string());
    }
    if is_blank(&record.date) {
        errors.push("Date is required".to_string());
    } else if !is_valid_date(&record.date) {
        errors.push("Invalid date format (expected DD/MM/YYYY)".to_string());
    }

    // MICR is optional; when present its digit-only form must be 9 digits.
    if !record.micr_code.is_empty() {
        let digits: String =
            record.micr_code.chars().filter(char::is_ascii_digit).collect();
        if !re_micr().is_match(&digits) {
            errors.push("Invalid MICR code format".to_string());
        }
    }

    errors
}

/// Format and completeness rules for a parsed e-NACH mandate.
pub fn validate_enach(record: &ENachRecord) -> Vec<String> {
    let mut errors = Vec::new();

    if is_blank(&record.bank_name) {
        errors.push("Bank name is required".to_string());
    }
    if is_blank(&record.account_number) {
        errors.push("Account number is required".to_string());
    }
    if is_blank(&record.account_holder_name) {
        errors.push("Account holder name is required".to_string());
    }
    if is_blank(&record.ifsc_code) {
        errors.push("IFSC code is required".to_string());
    } else if !re_ifsc().is_match(&record.ifsc_code) {
        errors.push("Invalid IFSC code format".to_string());
    }
    if is_blank(&record.max_amount) {
        errors.push("Maximum amount is required".to_string());
    }
    if is_blank(&record.frequency) {
        errors.push("Frequency is required".to_string());
    }

    // Mandate dates are optional but format-checked when present.
    if !record.start_date.is_empty() && !is_valid_date(&record.start_date) {
        errors.push("Invalid start date format (expected DD/MM/YYYY)".to_string());
    }
    if !record.end_date.is_empty() && !is_valid_date(&record.end_date) {
        errors.push("Invalid end date format (expected DD/MM/YYYY)".to_string());
    }
    if !record.date_of_mandate.is_empty() && !is_valid_date(&record.date_of_mandate) {
        errors.push("Invalid mandate date format (expected DD/MM/YYYY)".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_cheque() -> ChequeRecord {
        ChequeRecord {
            bank_name: "HDFC Bank".into(),
            account_number: "1234567890".into(),
            ifsc_code: "HDFC0001234".into(),
            cheque_number: "001234".into(),
            date: "15/08/2024".into(),
            ..ChequeRecord::default()
        }
    }

    fn valid_enach() -> ENachRecord {
        ENachRecord {
            bank_name: "ICICI Bank".into(),
            account_number: "000401567890".into(),
            account_holder_name: "Priya Sharma".into(),
            ifsc_code: "ICIC0000004".into(),
            max_amount: "25000".into(),
            frequency: "Monthly".into(),
            ..ENachRecord::default()
        }
    }

    // ── Cheque ────────────────────────────────────────────────────────────────

    #[test]
    fn complete_cheque_passes() {
        assert!(validate_cheque(&valid_cheque()).is_empty());
    }

    #[test]
    fn empty_cheque_reports_every_required_field_in_order() {
        let errors = validate_cheque(&ChequeRecord::default());
        assert_eq!(
            errors,
            vec![
                "Bank name is required",
                "Account number is required",
                "IFSC code is required",
                "Cheque number is required",
                "Date is required",
            ]
        );
    }

    #[test]
    fn ifsc_pattern_is_case_sensitive_with_literal_zero() {
        let check = |code: &str| {
            validate_cheque(&ChequeRecord { ifsc_code: code.into(), ..valid_cheque() })
        };
        assert!(check("HDFC0001234").is_empty());
        assert_eq!(check("hdfc0001234"), vec!["Invalid IFSC code format"]);
        assert_eq!(check("HDFC1001234"), vec!["Invalid IFSC code format"]);
        assert_eq!(check("HDFC000123").len(), 1);
        assert!(check("SBIN0070KDR").is_empty());
    }

    #[test]
    fn date_must_be_exactly_dd_mm_yyyy() {
        let check =
            |date: &str| validate_cheque(&ChequeRecord { date: date.into(), ..valid_cheque() });
        assert!(check("15/08/2024").is_empty());
        assert!(check("01/01/1999").is_empty());
        for bad in ["5/8/2024", "15-08-2024", "15/08/24", "2024/08/15", "15/08/20245"] {
            assert_eq!(check(bad), vec!["Invalid date format (expected DD/MM/YYYY)"], "{bad}");
        }
    }

    #[test]
    fn micr_is_optional_but_checked_when_present() {
        let check = |micr: &str| {
            validate_cheque(&ChequeRecord { micr_code: micr.into(), ..valid_cheque() })
        };
        assert!(check("").is_empty());
        assert!(check("110240002").is_empty());
        // Separators are stripped before the digit count.
        assert!(check("110240 002").is_empty());
        assert_eq!(check("12345"), vec!["Invalid MICR code format"]);
        assert_eq!(check("1102400021"), vec!["Invalid MICR code format"]);
    }

    #[test]
    fn whitespace_only_fields_count_as_missing() {
        let record = ChequeRecord { bank_name: "   ".into(), ..valid_cheque() };
        assert_eq!(validate_cheque(&record), vec!["Bank name is required"]);
    }

    // ── e-NACH ────────────────────────────────────────────────────────────────

    #[test]
    fn complete_enach_passes() {
        assert!(validate_enach(&valid_enach()).is_empty());
    }

    #[test]
    fn empty_enach_reports_required_fields_in_order() {
        let errors = validate_enach(&ENachRecord::default());
        assert_eq!(
            errors,
            vec![
                "Bank name is required",
                "Account number is required",
                "Account holder name is required",
                "IFSC code is required",
                "Maximum amount is required",
                "Frequency is required",
            ]
        );
    }

    #[test]
    fn enach_dates_are_optional_but_format_checked() {
        assert!(validate_enach(&valid_enach()).is_empty());

        let record = ENachRecord {
            start_date: "01/04/2024".into(),
            end_date: "April 2025".into(),
            date_of_mandate: "1/4/24".into(),
            ..valid_enach()
        };
        assert_eq!(
            validate_enach(&record),
            vec![
                "Invalid end date format (expected DD/MM/YYYY)",
                "Invalid mandate date format (expected DD/MM/YYYY)",
            ]
        );
    }

    #[test]
    fn all_violations_reported_without_short_circuit() {
        let record = ENachRecord { ifsc_code: "bad".into(), ..ENachRecord::default() };
        let errors = validate_enach(&record);
        assert!(errors.contains(&"Bank name is required".to_string()));
        assert!(errors.contains(&"Invalid IFSC code format".to_string()));
        assert!(errors.contains(&"Frequency is required".to_string()));
    }
}
