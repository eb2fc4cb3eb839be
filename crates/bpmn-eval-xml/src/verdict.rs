//! Validation façade.
//!
//! Runs the structural checks and, for valid documents only, attaches the
//! canonical form.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::canonicalizer::Canonicalizer;
use crate::schema::SchemaValidator;
use crate::validator::{ValidationReport, Validator};

/// Outcome of validating and canonicalizing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
    canonical_xml: Option<String>,
}

impl Verdict {
    /// Builds a verdict from a validation report, attaching `canonical_xml`
    /// only when the report is valid.
    pub fn from_report(report: ValidationReport, canonical_xml: Option<String>) -> Self {
        let valid = report.is_valid();
        Self {
            valid,
            errors: report.errors,
            warnings: report.warnings,
            canonical_xml: canonical_xml.filter(|_| valid),
        }
    }

    /// Whether the document passed every check.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Errors, in check order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Warnings, in check order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Canonical form; present only for valid documents.
    pub fn canonical_xml(&self) -> Option<&str> {
        self.canonical_xml.as_deref()
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Verdict", 6)?;
        state.serialize_field("valid", &self.valid)?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("warnings", &self.warnings)?;
        state.serialize_field("canonical_xml", &self.canonical_xml)?;
        state.serialize_field("error_count", &self.errors.len())?;
        state.serialize_field("warning_count", &self.warnings.len())?;
        state.end()
    }
}

/// Validates `document` and, when valid, attaches its canonical form.
///
/// Never fails: every problem is reported inside the returned [`Verdict`].
pub fn validate_and_canonicalize(
    document: &str,
    schema: Option<&dyn SchemaValidator>,
) -> Verdict {
    let report = Validator::with_schema(schema).validate(document);
    let canonical = if report.is_valid() {
        Some(Canonicalizer::new().canonicalize(document).xml)
    } else {
        None
    };
    Verdict::from_report(report, canonical)
}
