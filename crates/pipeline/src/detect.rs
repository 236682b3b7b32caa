use patra_core::DocumentType;

// Rich profile, applied to freshly captured documents.
const CAPTURE_CHEQUE_KEYWORDS: &[&str] = &[
    "pay to",
    "pay to the order of",
    "rupees",
    "account no",
    "ifsc",
    "micr",
    "cheque",
    "bank",
];
const CAPTURE_ENACH_KEYWORDS: &[&str] = &[
    "mandate",
    "nach",
    "autopay",
    "standing instruction",
    "utility",
    "umrn",
    "sponsor bank",
    "debit type",
];

// Reduced profile, applied when processing an existing image.
const EXISTING_CHEQUE_KEYWORDS: &[&str] = &["pay to", "rupees", "account no", "ifsc", "cheque"];
const EXISTING_ENACH_KEYWORDS: &[&str] = &["mandate", "nach", "utility", "umrn"];

/// Keyword-counting document-type detection over recognized text.
///
/// Two named profiles exist because the capture path and the
/// existing-image path historically shipped with different keyword sets
/// and thresholds; each call site keeps its exact behavior. The cheque
/// check runs first, so cheque wins when both thresholds are met.
#[derive(Debug, Clone)]
pub struct KeywordDetector {
    cheque_keywords: &'static [&'static str],
    enach_keywords: &'static [&'static str],
    cheque_threshold: usize,
    enach_threshold: usize,
}

impl KeywordDetector {
    /// 8+8 keyword profile with thresholds cheque >= 3, enach >= 2.
    pub fn capture_profile() -> Self {
        Self {
            cheque_keywords: CAPTURE_CHEQUE_KEYWORDS,
            enach_keywords: CAPTURE_ENACH_KEYWORDS,
            cheque_threshold: 3,
            enach_threshold: 2,
        }
    }

    /// 5+4 keyword profile with thresholds cheque >= 2, enach >= 1.
    pub fn existing_image_profile() -> Self {
        Self {
            cheque_keywords: EXISTING_CHEQUE_KEYWORDS,
            enach_keywords: EXISTING_ENACH_KEYWORDS,
            cheque_threshold: 2,
            enach_threshold: 1,
        }
    }

    /// Case-insensitive substring counting over the full text.
    pub fn detect(&self, text: &str) -> DocumentType {
        let lower = text.to_lowercase();
        let cheque_matches =
            self.cheque_keywords.iter().filter(|keyword| lower.contains(*keyword)).count();
        let enach_matches =
            self.enach_keywords.iter().filter(|keyword| lower.contains(*keyword)).count();

        if cheque_matches >= self.cheque_threshold {
            DocumentType::Cheque
        } else if enach_matches >= self.enach_threshold {
            DocumentType::Enach
        } else {
            DocumentType::Unknown
        }
    }
}
