//! Validate command implementation.

use std::path::PathBuf;

use bpmn_eval_xml::validate_and_canonicalize;

use super::open_schema;
use crate::input::read_document;
use crate::output::print_verdict;

pub fn run(
    input: Option<String>,
    xsd: Option<PathBuf>,
    canonicalize: bool,
    json_output: bool,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = open_schema(xsd.as_deref())?;
    let document = read_document(input)?;

    let verdict = validate_and_canonicalize(&document, schema.as_deref());
    tracing::debug!(valid = verdict.is_valid(), "validated document");

    if json_output {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        print_verdict(&verdict, canonicalize);
    }

    if strict && !verdict.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}
