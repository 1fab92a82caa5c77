// Privacy scanner — regex-based PII detection over message text.
//
// Pattern table ordered by category; the first matching pattern wins and
// the scan stops. Patterns are compiled once at first use and matched
// case-insensitively. This is a leak flagger, not a redactor: it reports
// the category of the first hit and nothing about its position.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Serialize;

/// A detected PII category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivacyMatch {
    /// Human-readable category name, e.g. "Phone Number".
    pub kind: &'static str,
}

struct PatternSet {
    kind: &'static str,
    patterns: Vec<Regex>,
}

/// Pattern table. Order matters: earlier categories shadow later ones
/// when a text matches several.
static SENSITIVE_PATTERNS: LazyLock<Vec<PatternSet>> = LazyLock::new(|| {
    let compile = |patterns: &[&str]| -> Vec<Regex> {
        patterns
            .iter()
            .map(|p| {
                Regex::new(&format!("(?i){p}"))
                    .unwrap_or_else(|e| panic!("invalid privacy pattern {p:?}: {e}"))
            })
            .collect()
    };

    vec![
        PatternSet {
            kind: "Home Address",
            patterns: compile(&[r"\b\d{1,5}\s+\w+\s+(street|st|road|rd|lane|ln|avenue|ave)\b"]),
        },
        PatternSet {
            kind: "House Number",
            patterns: compile(&[
                r"(house|home)\s*(no|number|#)?\s*(is|:)?\s*\d{4,}",
                r"\b\d{4,}\s*(house|home)\b",
            ]),
        },
        PatternSet {
            kind: "Phone Number",
            patterns: compile(&[r"\b\d{10}\b", r"\+\d{1,3}\s?\d{6,12}"]),
        },
        PatternSet {
            kind: "Bank Account Number",
            patterns: compile(&[
                r"(bank|account)\s*(no|number|#|detail|details)?\s*(is|:)?\s*\d{4,}",
                r"bank\s+detail.*?(?:account\s*)?(?:no|number|#)?\s*(?:is|:)?\s*\d{4,}",
            ]),
        },
        PatternSet {
            kind: "Password",
            patterns: compile(&[r"password\s*[:=]", r"pwd\s*[:=]"]),
        },
        PatternSet {
            kind: "Government ID",
            patterns: compile(&[
                // Aadhaar: three space-separated 4-digit groups
                r"\b\d{4}\s\d{4}\s\d{4}\b",
                // PAN: five letters, four digits, one letter
                r"\b[A-Z]{5}\d{4}[A-Z]\b",
            ]),
        },
        PatternSet {
            kind: "Email",
            patterns: compile(&[r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+"]),
        },
    ]
});

/// Scan a text for PII. Returns the first matching category, or None.
pub fn scan(text: &str) -> Option<PrivacyMatch> {
    for set in SENSITIVE_PATTERNS.iter() {
        if set.patterns.iter().any(|re| re.is_match(text)) {
            return Some(PrivacyMatch { kind: set.kind });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(text: &str) -> Option<&'static str> {
        scan(text).map(|m| m.kind)
    }

    #[test]
    fn test_home_address() {
        assert_eq!(kind_of("I live at 221 Baker Street"), Some("Home Address"));
        assert_eq!(kind_of("meet me at 14 elm ave tomorrow"), Some("Home Address"));
    }

    #[test]
    fn test_phone_number() {
        assert_eq!(kind_of("call me on 9876543210"), Some("Phone Number"));
        assert_eq!(kind_of("my number is +91 9876543210"), Some("Phone Number"));
    }

    #[test]
    fn test_bank_account() {
        assert_eq!(
            kind_of("my bank account number is 12345678"),
            Some("Bank Account Number")
        );
    }

    #[test]
    fn test_house_number_shadowed_by_address() {
        // "house no 12345" matches House Number; a full street address
        // matches Home Address first because of table order.
        assert_eq!(kind_of("our house number is 12345"), Some("House Number"));
    }

    #[test]
    fn test_password() {
        assert_eq!(kind_of("my password: hunter2"), Some("Password"));
        assert_eq!(kind_of("PWD = secret"), Some("Password"));
    }

    #[test]
    fn test_government_id() {
        assert_eq!(kind_of("aadhaar 1234 5678 9012"), Some("Government ID"));
        assert_eq!(kind_of("pan is ABCDE1234F"), Some("Government ID"));
        // Case-insensitive compilation keeps the PAN pattern live for
        // lowercase input too.
        assert_eq!(kind_of("pan is abcde1234f"), Some("Government ID"));
    }

    #[test]
    fn test_email() {
        assert_eq!(kind_of("reach me at kid@example.com"), Some("Email"));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(kind_of("see you after school"), None);
        assert_eq!(kind_of(""), None);
    }

    #[test]
    fn test_first_match_wins() {
        // Contains both a phone number and an email; Phone Number comes
        // first in the table.
        assert_eq!(
            kind_of("9876543210 or kid@example.com"),
            Some("Phone Number")
        );
    }
}
