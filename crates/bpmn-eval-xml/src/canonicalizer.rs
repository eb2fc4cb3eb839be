//! Canonical serialization for exact-match comparison.
//!
//! Two documents that differ only in attribute order, inter-element
//! whitespace or alias spelling canonicalize to the same string. The
//! canonicalizer is total: input that cannot be parsed comes back with only
//! the alias rewrite applied, flagged as degraded.

use crate::document::{Document, Element, Node};
use crate::rules::{rewrite_aliases, CANONICAL_ALIAS, WRONG_ALIAS_DECLARATIONS, XML_DECLARATION};

const INDENT: &str = "  ";

/// Output of a canonicalization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonicalization {
    /// Canonical text.
    pub xml: String,
    /// True when parsing failed and `xml` only carries the text-level fixes.
    ///
    /// A degraded form has no deterministic attribute order and is never
    /// equivalent to a fully canonical form.
    pub degraded: bool,
}

/// Produces the canonical form of BPMN documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Creates a canonicalizer.
    pub fn new() -> Self {
        Self
    }

    /// Canonicalizes `document`, reporting whether the degraded path was taken.
    pub fn canonicalize(&self, document: &str) -> Canonicalization {
        let fixed = rewrite_aliases(document);

        let mut root = match Document::parse(&fixed) {
            Ok(parsed) => parsed.into_root(),
            Err(err) => {
                tracing::warn!(error = %err, "canonicalizing unparsable document; alias fixes only");
                return Canonicalization {
                    xml: fixed,
                    degraded: true,
                };
            }
        };

        rename_alias_declarations(&mut root);
        root.sort_attributes();

        let mut xml = String::with_capacity(fixed.len() + XML_DECLARATION.len() + 1);
        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        write_element(&mut xml, &root, 0);

        Canonicalization {
            xml,
            degraded: false,
        }
    }
}

/// Returns the canonical string for `document`, degraded if unparsable.
pub fn canonicalize(document: &str) -> String {
    Canonicalizer::new().canonicalize(document).xml
}

// A wrong-alias declaration becomes `xmlns:bpmn`, unless the element
// already declares it; then the duplicate is dropped.
fn rename_alias_declarations(element: &mut Element) {
    let canonical = format!("xmlns:{}", CANONICAL_ALIAS);
    let mut declared = element.attribute(&canonical).is_some();
    let attributes = std::mem::take(&mut element.attributes);
    for (key, value) in attributes {
        if WRONG_ALIAS_DECLARATIONS.contains(&key.as_str()) {
            if declared {
                continue;
            }
            declared = true;
            element.attributes.push((canonical.clone(), value));
        } else {
            element.attributes.push((key, value));
        }
    }
    for node in &mut element.children {
        if let Node::Element(child) = node {
            rename_alias_declarations(child);
        }
    }
}

// Element-only content goes one child per line. Elements holding text keep
// their content inline so character data is never altered.
fn write_element(out: &mut String, element: &Element, depth: usize) {
    push_indent(out, depth);
    write_start(out, element);
    if element.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    if element.has_text() {
        for node in &element.children {
            write_inline(out, node);
        }
    } else {
        for child in element.child_elements() {
            out.push('\n');
            write_element(out, child, depth + 1);
        }
        out.push('\n');
        push_indent(out, depth);
    }
    write_end(out, element);
}

fn write_inline(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => escape_text(out, text),
        Node::Element(element) => {
            write_start(out, element);
            if element.is_empty() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in &element.children {
                write_inline(out, child);
            }
            write_end(out, element);
        }
    }
}

fn write_start(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_attribute(out, value);
        out.push('"');
    }
}

fn write_end(out: &mut String, element: &Element) {
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_attributes_and_indents() {
        let canonical = canonicalize(r#"<a z="1" b="2"><c y="1" x="2"/></a>"#);
        assert_eq!(
            canonical,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a b=\"2\" z=\"1\">\n  <c x=\"2\" y=\"1\"/>\n</a>"
        );
    }

    #[test]
    fn text_content_stays_on_one_line() {
        let canonical = canonicalize("<a>\n  <b>Flow_1</b>\n</a>");
        assert!(canonical.ends_with("<a>\n  <b>Flow_1</b>\n</a>"));
    }

    #[test]
    fn mixed_content_is_written_inline() {
        let canonical = canonicalize("<a>x <b/> y</a>");
        assert!(canonical.ends_with("<a>x <b/> y</a>"));
        assert_eq!(canonicalize(&canonical), canonical);
    }

    #[test]
    fn escapes_are_stable() {
        let canonical = canonicalize("<a v=\"&quot;1&quot; &amp; &lt;2&gt;\">x &amp; y</a>");
        assert!(canonical.ends_with("<a v=\"&quot;1&quot; &amp; &lt;2&gt;\">x &amp; y</a>"));
        assert_eq!(canonicalize(&canonical), canonical);
    }

    #[test]
    fn degraded_path_keeps_alias_fixes_only() {
        let result = Canonicalizer::new().canonicalize("<bpmns:process><oops></bpmns:process>");
        assert!(result.degraded);
        assert_eq!(result.xml, "<bpmn:process><oops></bpmn:process>");
    }

    #[test]
    fn wrong_alias_declaration_is_renamed() {
        let canonical = canonicalize(r#"<bpmns:a xmlns:bpmns="u"><bpmns:b/></bpmns:a>"#);
        assert!(canonical.ends_with("<bpmn:a xmlns:bpmn=\"u\">\n  <bpmn:b/>\n</bpmn:a>"));
    }

    #[test]
    fn duplicate_alias_declaration_is_dropped() {
        let result = Canonicalizer::new()
            .canonicalize(r#"<bpmn:a xmlns:BPMN="u" xmlns:bpmn="u" xmlns:bpmns="u" id="A"/>"#);
        assert!(!result.degraded);
        assert!(result.xml.ends_with(r#"<bpmn:a id="A" xmlns:bpmn="u"/>"#));
    }

    #[test]
    fn parsed_path_is_not_degraded() {
        assert!(!Canonicalizer::new().canonicalize("<a/>").degraded);
    }
}
