//! Fixed rule tables shared by the validator and canonicalizer.

/// The namespace alias every BPMN model element must use.
pub const CANONICAL_ALIAS: &str = "bpmn";

/// Element kinds that must appear somewhere in the raw document text.
pub const REQUIRED_ELEMENTS: [&str; 4] = ["definitions", "process", "startEvent", "endEvent"];

/// How a wrong alias is recognized on an element prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasMatch {
    /// Any letter case.
    IgnoreCase,
    /// Byte-for-byte.
    Exact,
}

/// Near-miss spellings of the canonical alias.
pub const WRONG_ALIASES: [(&str, AliasMatch); 2] = [
    ("bpmns", AliasMatch::IgnoreCase),
    ("BPMN", AliasMatch::Exact),
];

/// Raw-text fragments that mark malformed or legacy generator output.
/// Matched case-insensitively.
pub const DENY_LIST: [&str; 2] = ["flowNodeRef", "bpmns:"];

/// Flow-edge kinds and the attributes each must carry.
pub const EDGE_RULES: [(&str, &[&str]); 1] = [("sequenceFlow", &["sourceRef", "targetRef"])];

/// Layout markers that must always be written self-closing.
pub const SELF_CLOSING_MARKERS: [&str; 1] = ["waypoint"];

/// Text-level alias rewrites, longest spelling first.
pub const ALIAS_REWRITES: [(&str, &str); 2] = [("bpmns:", "bpmn:"), ("BPMN:", "bpmn:")];

/// Declarations of wrong aliases. The canonicalizer renames them to
/// `xmlns:bpmn` on the parsed tree, or drops them when the element already
/// declares the canonical alias.
pub const WRONG_ALIAS_DECLARATIONS: [&str; 2] = ["xmlns:bpmns", "xmlns:BPMN"];

/// Declaration line every canonical document starts with.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Applies [`ALIAS_REWRITES`] as plain substring replacement.
pub fn rewrite_aliases(text: &str) -> String {
    ALIAS_REWRITES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

impl AliasMatch {
    /// Whether `prefix` is the given wrong alias under this matching mode.
    pub fn matches(self, alias: &str, prefix: &str) -> bool {
        match self {
            AliasMatch::IgnoreCase => alias.eq_ignore_ascii_case(prefix),
            AliasMatch::Exact => alias == prefix,
        }
    }
}
