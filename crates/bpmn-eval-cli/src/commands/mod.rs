pub mod canonicalize;
pub mod extract;
pub mod metrics;
pub mod validate;

use std::path::Path;

use bpmn_eval_xml::{load_schema, SchemaValidator};

/// Loads the schema named on the command line, if any.
pub fn open_schema(
    xsd: Option<&Path>,
) -> Result<Option<Box<dyn SchemaValidator>>, Box<dyn std::error::Error>> {
    let Some(path) = xsd else {
        return Ok(None);
    };
    let schema = load_schema(path).map_err(|e| format!("Failed to load schema: {}", e))?;
    Ok(Some(schema))
}
