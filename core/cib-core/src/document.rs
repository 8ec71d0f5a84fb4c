//! Owned XML element tree for CIB documents.
//!
//! The decoder needs DOM-style access (attributes by name, descendants by tag
//! at any depth), so the `quick-xml` event stream is folded into a small tree
//! once and queried afterwards. Text content is not kept: nothing in the CIB
//! status section stores data outside attributes.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{CibError, Result};

/// Deepest element nesting accepted. Real CIBs stay below a dozen levels; the
/// bound keeps tree walks and drops from exhausting the stack.
pub const MAX_DEPTH: usize = 256;

/// A single XML element with its attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All descendants (not including `self`) with the given tag, in document
    /// pre-order, at any depth.
    pub fn descendants_by_tag<'a>(&'a self, tag: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        for child in &self.children {
            child.collect_by_tag(tag, &mut found);
        }
        found
    }

    fn collect_by_tag<'a>(&'a self, tag: &str, found: &mut Vec<&'a Element>) {
        let mut pending = vec![self];
        while let Some(element) = pending.pop() {
            if element.name == tag {
                found.push(element);
            }
            // Reversed so the first child is visited next (pre-order).
            pending.extend(element.children.iter().rev());
        }
    }
}

/// A parsed CIB document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parses an XML string into an element tree.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        // Open elements; the bottom of the stack becomes the root.
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(|source| CibError::Parse {
                context: "reading CIB XML".to_string(),
                source,
            })?;

            match event {
                Event::Start(start) => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(CibError::MalformedDocument(format!(
                            "nesting too deep (more than {} levels)",
                            MAX_DEPTH
                        )));
                    }
                    stack.push(element_from_start(&start)?);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(element, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    // Mismatched end names are rejected by the reader itself.
                    let element = stack.pop().ok_or_else(|| {
                        CibError::MalformedDocument("unexpected closing tag".to_string())
                    })?;
                    attach(element, &mut stack, &mut root)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(CibError::MalformedDocument(format!(
                "element <{}> is never closed",
                open.name
            )));
        }

        root.map(|root| Self { root })
            .ok_or_else(|| CibError::MalformedDocument("document has no root element".to_string()))
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Every element with the given tag, including the root, in document order.
    pub fn elements_by_tag<'a>(&'a self, tag: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.root.collect_by_tag(tag, &mut found);
        found
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| CibError::Parse {
            context: format!("attribute of <{}>", element.name),
            source: err.into(),
        })?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|source| CibError::Parse {
                context: format!("value of attribute {} on <{}>", key, element.name),
                source,
            })?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(CibError::MalformedDocument(format!(
            "second root element <{}>",
            element.name
        ))),
    }
}
