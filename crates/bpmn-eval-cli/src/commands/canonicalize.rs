//! Canonicalize command implementation.

use bpmn_eval_xml::Canonicalizer;

use crate::input::read_document;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_document(input)?;

    let result = Canonicalizer::new().canonicalize(&document);
    if result.degraded {
        eprintln!("Warning: input is not well-formed; only namespace aliases were fixed");
    }

    println!("{}", result.xml);
    Ok(())
}
