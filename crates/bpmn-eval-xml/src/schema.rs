//! Optional schema-validation capability.
//!
//! The validator never links a schema engine directly. Callers inject any
//! [`SchemaValidator`]; the libxml2-backed [`XsdSchema`] is available behind
//! the `xsd` feature, and [`UnavailableSchema`] stands in when it is not.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by a schema engine.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// No schema engine is compiled into this build.
    #[error("schema engine unavailable")]
    Unavailable,
    /// The schema file does not exist.
    #[error("schema file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The schema file exists but could not be compiled.
    #[error("schema load error: {0}")]
    Load(String),
    /// The engine failed while checking a document.
    #[error("{0}")]
    Engine(String),
}

/// A pass/fail oracle that checks a document against a schema.
pub trait SchemaValidator: Send + Sync {
    /// Returns the list of schema violations (empty when the document conforms).
    ///
    /// `Err` means the engine could not run; the validator downgrades it to
    /// a warning.
    fn validate_schema(&self, document: &str) -> Result<Vec<String>, SchemaError>;
}

/// Capability used when no schema engine is compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSchema;

impl SchemaValidator for UnavailableSchema {
    fn validate_schema(&self, _document: &str) -> Result<Vec<String>, SchemaError> {
        Err(SchemaError::Unavailable)
    }
}

/// Opens the schema at `path` with the best engine this build offers.
///
/// A missing file is a configuration problem and is returned as `Err`.
/// Without the `xsd` feature the returned capability always reports itself
/// unavailable.
pub fn load_schema(path: &Path) -> Result<Box<dyn SchemaValidator>, SchemaError> {
    if !path.exists() {
        return Err(SchemaError::NotFound(path.to_path_buf()));
    }

    #[cfg(feature = "xsd")]
    {
        Ok(Box::new(XsdSchema::from_file(path)?))
    }

    #[cfg(not(feature = "xsd"))]
    {
        tracing::warn!(schema = %path.display(), "built without the `xsd` feature; schema checks will be skipped");
        Ok(Box::new(UnavailableSchema))
    }
}

#[cfg(feature = "xsd")]
pub use xsd::XsdSchema;

#[cfg(feature = "xsd")]
mod xsd {
    use std::path::{Path, PathBuf};

    use libxml::{
        error::StructuredError,
        parser::Parser,
        schemas::{SchemaParserContext, SchemaValidationContext},
    };

    use super::{SchemaError, SchemaValidator};

    /// XSD schema checked through libxml2.
    ///
    /// libxml2 validation contexts are not thread-safe, so a fresh context is
    /// compiled for every document.
    #[derive(Debug, Clone)]
    pub struct XsdSchema {
        path: PathBuf,
    }

    impl XsdSchema {
        /// Compiles the schema once to surface load errors early.
        pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
            if !path.exists() {
                return Err(SchemaError::NotFound(path.to_path_buf()));
            }
            let schema = Self {
                path: path.to_path_buf(),
            };
            schema.context()?;
            Ok(schema)
        }

        fn context(&self) -> Result<SchemaValidationContext, SchemaError> {
            let xsd_path = self
                .path
                .to_str()
                .ok_or_else(|| SchemaError::Load("schema path is not valid UTF-8".to_string()))?;
            let mut parser_ctx = SchemaParserContext::from_file(xsd_path);
            SchemaValidationContext::from_parser(&mut parser_ctx)
                .map_err(|errors| SchemaError::Load(join_messages(&errors)))
        }
    }

    impl SchemaValidator for XsdSchema {
        fn validate_schema(&self, document: &str) -> Result<Vec<String>, SchemaError> {
            let mut ctx = self.context()?;
            let parsed = Parser::default()
                .parse_string(document)
                .map_err(|err| SchemaError::Engine(format!("failed to parse XML: {:?}", err)))?;
            match ctx.validate_document(&parsed) {
                Ok(()) => Ok(Vec::new()),
                Err(errors) => Ok(errors.iter().map(describe).collect()),
            }
        }
    }

    fn describe(error: &StructuredError) -> String {
        error
            .message
            .as_deref()
            .map(str::trim)
            .unwrap_or("unknown schema error")
            .to_string()
    }

    fn join_messages(errors: &[StructuredError]) -> String {
        errors.iter().map(describe).collect::<Vec<_>>().join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_schema_file_is_an_error() {
        let err = load_schema(Path::new("/definitely/not/here.xsd")).err().unwrap();
        assert!(matches!(err, SchemaError::NotFound(_)));
    }

    const TINY_XSD: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="a" type="xs:string"/>
</xs:schema>"#;

    fn write_schema(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("tiny.xsd");
        std::fs::write(&path, TINY_XSD).unwrap();
        path
    }

    #[cfg(not(feature = "xsd"))]
    #[test]
    fn existing_schema_without_engine_is_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let schema = load_schema(&write_schema(&dir)).unwrap();
        assert!(matches!(
            schema.validate_schema("<a>x</a>"),
            Err(SchemaError::Unavailable)
        ));
    }

    #[cfg(feature = "xsd")]
    #[test]
    fn existing_schema_checks_documents() {
        let dir = tempfile::TempDir::new().unwrap();
        let schema = load_schema(&write_schema(&dir)).unwrap();
        assert!(schema.validate_schema("<a>x</a>").unwrap().is_empty());
        assert!(!schema.validate_schema("<b/>").unwrap().is_empty());
    }

    #[test]
    fn unavailable_schema_always_refuses() {
        assert!(matches!(
            UnavailableSchema.validate_schema("<a/>"),
            Err(SchemaError::Unavailable)
        ));
    }
}
