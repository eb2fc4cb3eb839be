//! Rule-based structural validation of generated BPMN documents.
//!
//! Checks run in a fixed order and accumulate into a report owned by the
//! call. Only a parse failure stops the run early; every other check is
//! independent of the others.
//!
//! The required-element and deny-list checks scan the raw text on purpose:
//! they must keep catching fragments whatever the tree looks like. The
//! remaining structural checks walk the parsed tree.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::{local_name, Document, Element};
use crate::rules::{
    AliasMatch, CANONICAL_ALIAS, DENY_LIST, EDGE_RULES, REQUIRED_ELEMENTS,
    SELF_CLOSING_MARKERS, WRONG_ALIASES,
};
use crate::schema::{SchemaError, SchemaValidator};

/// Errors and warnings produced by one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Violations that make the document invalid.
    pub errors: Vec<String>,
    /// Informational findings that do not affect validity.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// A document is valid exactly when no errors were recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Structural validator with an optional injected schema engine.
///
/// Holds no per-call state; one instance can be shared across threads.
#[derive(Clone, Copy, Default)]
pub struct Validator<'a> {
    schema: Option<&'a dyn SchemaValidator>,
}

impl<'a> Validator<'a> {
    /// Creates a validator that runs the structural checks only.
    pub fn new() -> Self {
        Self { schema: None }
    }

    /// Creates a validator that also delegates to `schema`.
    pub fn with_schema(schema: Option<&'a dyn SchemaValidator>) -> Self {
        Self { schema }
    }

    /// Validates `document` and returns every finding.
    pub fn validate(&self, document: &str) -> ValidationReport {
        let mut report = ValidationReport::default();

        let parsed = match Document::parse(document) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::debug!(error = %err, "document is not well-formed");
                report.error(format!("Malformed XML: {}", err));
                return report;
            }
        };
        let root = parsed.root();

        check_required_elements(document, &mut report);
        check_namespaces(root, &mut report);
        check_deny_list(document, &mut report);
        check_edge_attributes(root, &mut report);
        check_self_closing_markers(root, &mut report);
        if let Some(schema) = self.schema {
            check_schema(schema, document, &mut report);
        }

        tracing::debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "structural validation finished"
        );
        report
    }
}

fn required_element_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let names = REQUIRED_ELEMENTS.join("|");
        Regex::new(&format!(r"(?i)<(?:[a-z_][a-z0-9_.\-]*:)?({})", names))
            .expect("invalid regex")
    })
}

fn check_required_elements(document: &str, report: &mut ValidationReport) {
    let found: Vec<String> = required_element_pattern()
        .captures_iter(document)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str().to_ascii_lowercase())
        .collect();

    for required in REQUIRED_ELEMENTS {
        if !found.iter().any(|name| name.eq_ignore_ascii_case(required)) {
            report.error(format!("Missing required element: {}", required));
        }
    }
}

fn check_namespaces(root: &Element, report: &mut ValidationReport) {
    let elements = root.descendants();

    for (alias, mode) in WRONG_ALIASES {
        let used = elements
            .iter()
            .filter_map(|element| element.prefix())
            .any(|prefix| mode.matches(alias, prefix));
        if used {
            let shown = match mode {
                AliasMatch::IgnoreCase => alias.to_ascii_lowercase(),
                AliasMatch::Exact => alias.to_string(),
            };
            report.error(format!(
                "Invalid namespace prefix: {}: (should be {}:)",
                shown, CANONICAL_ALIAS
            ));
        }
    }

    let qualified = elements.iter().any(|element| element.prefix().is_some());
    let declared = elements.iter().any(|element| {
        element
            .attributes
            .iter()
            .any(|(key, _)| key == "xmlns" || key.starts_with("xmlns:"))
    });
    if qualified && !declared {
        report.warning("Missing namespace declaration");
    }
}

fn check_deny_list(document: &str, report: &mut ValidationReport) {
    let lowered = document.to_lowercase();
    for fragment in DENY_LIST {
        if lowered.contains(&fragment.to_lowercase()) {
            report.error(format!("Invalid element found: {}", fragment));
        }
    }
}

fn check_edge_attributes(root: &Element, report: &mut ValidationReport) {
    for element in root.descendants() {
        for (kind, required) in EDGE_RULES {
            if !element.local_name().eq_ignore_ascii_case(kind) {
                continue;
            }
            for attribute in required {
                let present = element
                    .attributes
                    .iter()
                    .any(|(key, _)| local_name(key).eq_ignore_ascii_case(attribute));
                if !present {
                    report.error(format!("{} missing required attribute: {}", kind, attribute));
                }
            }
        }
    }
}

fn check_self_closing_markers(root: &Element, report: &mut ValidationReport) {
    for marker in SELF_CLOSING_MARKERS {
        let open_form = root.descendants().into_iter().any(|element| {
            element.local_name().eq_ignore_ascii_case(marker) && !element.self_closing
        });
        if open_form {
            report.error(format!(
                "di:{marker} tags must be self-closing: <di:{marker} x=\"...\" y=\"...\"/>"
            ));
        }
    }
}

fn check_schema(schema: &dyn SchemaValidator, document: &str, report: &mut ValidationReport) {
    match schema.validate_schema(document) {
        Ok(violations) => {
            for violation in violations {
                report.error(format!("XSD validation error: {}", violation));
            }
        }
        Err(SchemaError::Unavailable) => {
            tracing::warn!("schema engine unavailable; skipping XSD validation");
            report.warning("XSD validation skipped: schema engine unavailable");
        }
        Err(err) => {
            tracing::warn!(error = %err, "schema engine failed; skipping XSD validation");
            report.warning(format!("XSD validation failed: {}", err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL"><bpmn:process id="P"><bpmn:startEvent id="S"/><bpmn:endEvent id="E"/></bpmn:process></bpmn:definitions>"#;

    #[test]
    fn minimal_document_is_valid() {
        let report = Validator::new().validate(MINIMAL);
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn required_elements_match_any_prefix_and_case() {
        let mut report = ValidationReport::default();
        check_required_elements(
            "<DEFINITIONS><foo:Process><STARTEVENT/><x:endevent/></foo:Process></DEFINITIONS>",
            &mut report,
        );
        assert!(report.errors.is_empty(), "{:?}", report.errors);
    }

    #[test]
    fn unprefixed_tags_need_no_declaration() {
        let report = Validator::new().validate(
            "<definitions><process><startEvent/><endEvent/></process></definitions>",
        );
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn prefixed_tags_without_declaration_warn() {
        let report = Validator::new().validate(
            "<bpmn:definitions><bpmn:process><bpmn:startEvent/><bpmn:endEvent/></bpmn:process></bpmn:definitions>",
        );
        assert!(report.is_valid());
        assert_eq!(report.warnings, vec!["Missing namespace declaration".to_string()]);
    }

    #[test]
    fn uppercase_alias_is_flagged_but_lowercase_is_not() {
        let mut report = ValidationReport::default();
        let doc = Document::parse("<BPMN:definitions xmlns:BPMN=\"x\"/>").unwrap();
        check_namespaces(doc.root(), &mut report);
        assert_eq!(
            report.errors,
            vec!["Invalid namespace prefix: BPMN: (should be bpmn:)".to_string()]
        );

        let mut report = ValidationReport::default();
        let doc = Document::parse("<bpmn:definitions xmlns:bpmn=\"x\"/>").unwrap();
        check_namespaces(doc.root(), &mut report);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn closing_sequence_flow_tags_are_not_edges() {
        let mut report = ValidationReport::default();
        let doc = Document::parse(
            r#"<p><sequenceFlow id="f" sourceRef="a" targetRef="b"></sequenceFlow></p>"#,
        )
        .unwrap();
        check_edge_attributes(doc.root(), &mut report);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn edge_attributes_match_case_insensitively() {
        let mut report = ValidationReport::default();
        let doc = Document::parse(r#"<p><SEQUENCEFLOW SOURCEREF="a"/></p>"#).unwrap();
        check_edge_attributes(doc.root(), &mut report);
        assert_eq!(
            report.errors,
            vec!["sequenceFlow missing required attribute: targetRef".to_string()]
        );
    }

    #[test]
    fn open_waypoints_yield_one_aggregate_error() {
        let mut report = ValidationReport::default();
        let doc = Document::parse(
            r#"<e><di:waypoint x="1" y="2"></di:waypoint><di:waypoint x="3" y="4"></di:waypoint><di:waypoint x="5" y="6"/></e>"#,
        )
        .unwrap();
        check_self_closing_markers(doc.root(), &mut report);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("must be self-closing"));
    }
}
