//! Owned element tree built from a namespace-lenient XML parse.
//!
//! Qualified names are kept exactly as written. Prefixes are not resolved
//! against `xmlns` declarations, so a document that uses an undeclared alias
//! (for example `bpmns:`) still parses and can be reported on by the
//! validator instead of being rejected as malformed.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Deepest element nesting accepted by [`Document::parse`].
///
/// Tree walks recurse once per level, so deeper input is rejected before
/// any tree is built.
pub const MAX_DEPTH: usize = 512;

/// Error returned when a document is not well-formed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Syntax error reported by the underlying reader.
    #[error("{0}")]
    Syntax(String),
    /// Malformed or duplicate attribute.
    #[error("invalid attribute: {0}")]
    Attribute(String),
    /// End tag does not match the innermost open element.
    #[error("mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEnd {
        /// Name of the element that was open.
        expected: String,
        /// Name found in the end tag.
        found: String,
    },
    /// End tag without any open element.
    #[error("unexpected end tag </{0}>")]
    UnexpectedEnd(String),
    /// Input ended while an element was still open.
    #[error("unclosed element <{0}>")]
    Unclosed(String),
    /// Input contains no root element.
    #[error("no root element")]
    NoRoot,
    /// More than one top-level element.
    #[error("junk after document element")]
    MultipleRoots,
    /// Non-whitespace character data outside the root element.
    #[error("text outside of the document element")]
    TextOutsideRoot,
    /// Elements nested deeper than [`MAX_DEPTH`].
    #[error("element nesting exceeds {0} levels")]
    TooDeep(usize),
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        ParseError::Syntax(err.to_string())
    }
}

impl From<AttrError> for ParseError {
    fn from(err: AttrError) -> Self {
        ParseError::Attribute(err.to_string())
    }
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Character data (entity references already resolved).
    Text(String),
}

/// A single element with its attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written, e.g. `bpmn:startEvent`.
    pub name: String,
    /// Attributes in source order, values unescaped.
    pub attributes: Vec<(String, String)>,
    /// Ordered child nodes.
    pub children: Vec<Node>,
    /// Whether the element was written as `<name/>`.
    pub self_closing: bool,
}

impl Element {
    /// Namespace prefix of the element name, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Element name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Returns the value of the attribute with the given qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// True when some direct text child has non-whitespace content.
    pub fn has_text(&self) -> bool {
        self.children.iter().any(|node| match node {
            Node::Text(text) => !text.trim().is_empty(),
            Node::Element(_) => false,
        })
    }

    /// True when the element has no child elements and no meaningful text.
    pub fn is_empty(&self) -> bool {
        self.child_elements().next().is_none() && !self.has_text()
    }

    /// This element and all nested elements, depth-first in document order.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.push(self);
        for child in self.child_elements() {
            child.collect_descendants(out);
        }
    }

    /// Sorts attributes by name at this element and every nested element.
    pub fn sort_attributes(&mut self) {
        self.attributes.sort_by(|(a, _), (b, _)| a.cmp(b));
        for node in &mut self.children {
            if let Node::Element(child) = node {
                child.sort_attributes();
            }
        }
    }
}

/// Strips the namespace prefix from a qualified name.
pub fn local_name(qualified: &str) -> &str {
    qualified
        .rsplit_once(':')
        .map_or(qualified, |(_, local)| local)
}

/// A parsed document: exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parses `input` into an element tree.
    ///
    /// Comments, processing instructions and the doctype are dropped and
    /// CDATA sections become plain text.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut reader = Reader::from_str(input);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(ParseError::MultipleRoots);
                    }
                    check_depth(&stack)?;
                    stack.push(open_element(&start, false)?);
                }
                Event::Empty(start) => {
                    check_depth(&stack)?;
                    let element = open_element(&start, true)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(end) => {
                    let found = decode(end.name().as_ref())?;
                    let element = stack
                        .pop()
                        .ok_or_else(|| ParseError::UnexpectedEnd(found.clone()))?;
                    if element.name != found {
                        return Err(ParseError::MismatchedEnd {
                            expected: element.name,
                            found,
                        });
                    }
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let content = text.unescape()?;
                    push_text(&mut stack, &content)?;
                }
                Event::CData(cdata) => {
                    let content = decode(&cdata.into_inner())?;
                    push_text(&mut stack, &content)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(ParseError::Unclosed(open.name));
        }
        root.map(|root| Document { root }).ok_or(ParseError::NoRoot)
    }

    /// The document element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Consumes the document, returning its root element.
    pub fn into_root(self) -> Element {
        self.root
    }
}

fn decode(bytes: &[u8]) -> Result<String, ParseError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|err| ParseError::Syntax(err.to_string()))
}

fn check_depth(stack: &[Element]) -> Result<(), ParseError> {
    if stack.len() >= MAX_DEPTH {
        return Err(ParseError::TooDeep(MAX_DEPTH));
    }
    Ok(())
}

fn open_element(start: &BytesStart<'_>, self_closing: bool) -> Result<Element, ParseError> {
    let name = decode(start.name().as_ref())?;
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = decode(attribute.key.as_ref())?;
        let value = attribute.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        self_closing,
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::MultipleRoots);
    }
    *root = Some(element);
    Ok(())
}

fn push_text(stack: &mut [Element], content: &str) -> Result<(), ParseError> {
    let Some(parent) = stack.last_mut() else {
        if content.trim().is_empty() {
            return Ok(());
        }
        return Err(ParseError::TextOutsideRoot);
    };
    // Adjacent text and CDATA merge into one node.
    if let Some(Node::Text(previous)) = parent.children.last_mut() {
        previous.push_str(content);
    } else {
        parent.children.push(Node::Text(content.to_string()));
    }
    Ok(())
}
