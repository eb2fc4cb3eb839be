//! Prompt redaction.
//!
//! Patterns are deliberately simple; the contract that matters downstream is
//! the `(redacted_text, detected_kinds)` pair.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Kind of personally identifiable information found in a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiKind {
    /// E-mail address.
    Email,
    /// US-style phone number.
    Phone,
    /// US social security number.
    Ssn,
    /// 16-digit payment card number.
    CreditCard,
}

impl PiiKind {
    fn placeholder(self) -> &'static str {
        match self {
            PiiKind::Email => "[EMAIL]",
            PiiKind::Phone => "[PHONE]",
            PiiKind::Ssn => "[SSN]",
            PiiKind::CreditCard => "[CARD]",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            PiiKind::Email => r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
            PiiKind::Phone => r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b",
            PiiKind::Ssn => r"\b\d{3}-\d{2}-\d{4}\b",
            PiiKind::CreditCard => r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b",
        }
    }
}

/// Order in which patterns are applied.
const SCAN_ORDER: [PiiKind; 4] = [
    PiiKind::Email,
    PiiKind::Phone,
    PiiKind::Ssn,
    PiiKind::CreditCard,
];

fn patterns() -> &'static [(PiiKind, Regex)] {
    static PATTERNS: OnceLock<Vec<(PiiKind, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SCAN_ORDER
            .iter()
            .map(|&kind| (kind, Regex::new(kind.pattern()).expect("invalid regex")))
            .collect()
    })
}

/// Replaces every detected PII span with a placeholder.
///
/// Returns the redacted text and the kinds found, in scan order.
pub fn redact_pii(text: &str) -> (String, Vec<PiiKind>) {
    let mut redacted = text.to_string();
    let mut detected = Vec::new();
    for (kind, regex) in patterns() {
        if regex.is_match(&redacted) {
            redacted = regex.replace_all(&redacted, kind.placeholder()).into_owned();
            detected.push(*kind);
        }
    }
    (redacted, detected)
}
