//! Document input resolution.

use std::io::{self, Read};
use std::path::Path;

/// Reads a document from a file path, literal XML, or stdin.
///
/// An argument that names an existing file is read from disk; `-` or no
/// argument reads stdin; anything else is taken as the document itself.
pub fn read_document(input: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    match input.as_deref() {
        None | Some("-") => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        Some(arg) if Path::new(arg).is_file() => {
            let text = std::fs::read_to_string(arg)
                .map_err(|e| format!("Failed to read file {}: {}", arg, e))?;
            Ok(text)
        }
        Some(literal) => Ok(literal.to_string()),
    }
}
