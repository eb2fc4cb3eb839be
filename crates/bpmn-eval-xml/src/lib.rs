//! Validation and canonicalization of generated BPMN 2.0 process XML.
//!
//! This crate provides:
//! - A namespace-lenient element tree ([`Document`])
//! - A rule-based structural [`Validator`] with an injectable schema engine
//! - A total [`Canonicalizer`] producing an order-independent textual form
//! - [`validate_and_canonicalize`], combining both into a [`Verdict`]
//!
//! Every operation is a pure function of its input; nothing is cached or
//! shared between calls, so documents can be processed in parallel.
//!
//! ## Quick Start
//!
//! ```rust
//! use bpmn_eval_xml::validate_and_canonicalize;
//!
//! let xml = r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL">
//!   <bpmn:process id="P"><bpmn:startEvent id="S"/><bpmn:endEvent id="E"/></bpmn:process>
//! </bpmn:definitions>"#;
//!
//! let verdict = validate_and_canonicalize(xml, None);
//! assert!(verdict.is_valid());
//! assert!(verdict.canonical_xml().unwrap().starts_with("<?xml"));
//! ```
#![deny(missing_docs)]

/// Canonical serialization.
pub mod canonicalizer;
/// Element tree and lenient parser.
pub mod document;
/// Fixed rule tables (aliases, deny list, edge rules).
pub mod rules;
/// Injectable schema-validation capability.
pub mod schema;
/// Structural validator.
pub mod validator;
/// Validation façade and verdict type.
pub mod verdict;

pub use canonicalizer::{canonicalize, Canonicalization, Canonicalizer};
pub use document::{Document, Element, Node, ParseError};
pub use schema::{load_schema, SchemaError, SchemaValidator, UnavailableSchema};
#[cfg(feature = "xsd")]
pub use schema::XsdSchema;
pub use validator::{ValidationReport, Validator};
pub use verdict::{validate_and_canonicalize, Verdict};
