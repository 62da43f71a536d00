//! Minimal XML element tree
//!
//! Input and reference documents are small, so they are read fully into an
//! owned tree of [`Element`]s and queried by element name. Attributes,
//! comments and processing instructions are ignored; namespace prefixes are
//! stripped from element names.

use quick_xml::Reader;
use quick_xml::events::Event;
use std::fmt::Display;

use crate::error::{Error, Result};

/// One XML element with its accumulated text and child elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Local element name
    pub name: String,

    /// Concatenated text and CDATA content directly inside this element
    pub text: String,

    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create an element holding only text
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Append a child element, builder style
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Parse a complete document and return its root element
    ///
    /// # Example
    ///
    /// ```rust
    /// use genreport_core::xml::Element;
    ///
    /// let root = Element::parse("<A><B>1</B></A>").unwrap();
    /// assert_eq!(root.child_text("B"), Some("1"));
    /// ```
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(parse_error)? {
                Event::Start(start) => {
                    stack.push(Element::new(decode_name(start.local_name().as_ref())?));
                }
                Event::Empty(start) => {
                    let element = Element::new(decode_name(start.local_name().as_ref())?);
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| Error::XmlParse {
                        message: "closing tag without matching opening tag".to_string(),
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape().map_err(parse_error)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::XmlParse {
                message: format!("element <{}> is never closed", open.name),
            });
        }

        root.ok_or_else(|| Error::XmlParse {
            message: "document has no root element".to_string(),
        })
    }

    /// Trimmed text content
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Trimmed text of the first direct child with the given name
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(Element::text)
    }

    /// All descendants (not including `self`) with the given name, in
    /// document order
    pub fn descendants(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_descendants(self, name, &mut found);
        found
    }

    /// First descendant (not including `self`) with the given name
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|child| {
            if child.name == name {
                Some(child)
            } else {
                child.find(name)
            }
        })
    }

    /// Text of a required child element
    pub fn required_text(&self, field: &str) -> Result<&str> {
        self.child_text(field).ok_or_else(|| Error::MissingField {
            element: self.name.clone(),
            field: field.to_string(),
        })
    }

    /// Required child element parsed as a float
    pub fn required_f64(&self, field: &str) -> Result<f64> {
        parse_f64(field, self.required_text(field)?)
    }
}

/// Parse numeric element text, reporting the field on failure
pub fn parse_f64(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::MalformedNumericField {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn collect_descendants<'a>(element: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    for child in &element.children {
        if child.name == name {
            found.push(child);
        }
        collect_descendants(child, name, found);
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(Error::XmlParse {
                message: format!("second root element <{}>", element.name),
            });
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn decode_name(raw: &[u8]) -> Result<String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(parse_error)
}

fn parse_error(err: impl Display) -> Error {
    Error::XmlParse {
        message: err.to_string(),
    }
}
