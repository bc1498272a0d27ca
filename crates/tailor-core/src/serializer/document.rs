//! Minimal element tree for XML-shaped documents
//!
//! The XML serializer builds an [`Element`] tree, writes it with `quick-xml`,
//! and re-parses its own output when a rendered document has to be re-rooted
//! or extended with metadata. Only elements and text are modelled; attributes,
//! comments and processing instructions are dropped on parse.

use crate::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use regex::Regex;
use std::sync::OnceLock;

static ELEMENT_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn element_name_regex() -> &'static Regex {
    ELEMENT_NAME_REGEX.get_or_init(|| {
        Regex::new(r"^[\p{L}_:][\p{L}\p{N}_.:\-]*$").expect("element name pattern is valid")
    })
}

/// Whether `name` can be used as an XML element name
pub fn is_valid_element_name(name: &str) -> bool {
    element_name_regex().is_match(name)
}

/// Whether `text` only holds characters allowed in XML 1.0 content
pub fn is_valid_text(text: &str) -> bool {
    text.chars().all(|c| {
        matches!(c, '\t' | '\n' | '\r')
            || ('\u{20}'..='\u{D7FF}').contains(&c)
            || ('\u{E000}'..='\u{FFFD}').contains(&c)
            || c >= '\u{10000}'
    })
}

/// One element with its text content and child elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element, rejecting names XML cannot carry
    pub fn try_new(name: &str) -> Result<Self> {
        if !is_valid_element_name(name) {
            return Err(Error::InvalidElementName {
                name: name.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            ..Self::default()
        })
    }

    /// First child named `name`
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Names of the direct children, in document order
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|child| child.name.as_str()).collect()
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty() && self.children.is_empty()
    }
}

/// A single-rooted document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    /// Create a document whose root element is named `root_name`
    pub fn new(root_name: &str) -> Result<Self> {
        Ok(Self {
            root: Element::try_new(root_name)?,
        })
    }

    /// Parse a document; exactly one root element is required
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(Error::xml)? {
                Event::Start(start) => stack.push(Element {
                    name: element_name(&start)?,
                    ..Element::default()
                }),
                Event::Empty(start) => {
                    let element = Element {
                        name: element_name(&start)?,
                        ..Element::default()
                    };
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::invalid_document("unexpected closing tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    // Whitespace between the declaration and the root is not content.
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape().map_err(Error::xml)?);
                    }
                }
                Event::CData(cdata) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&cdata));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::invalid_document(format!(
                "element '{}' is never closed",
                open.name
            )));
        }
        root.map(|root| Self { root })
            .ok_or_else(|| Error::invalid_document("document has no root element"))
    }

    /// Write the document: declaration, newline, compact root element, newline
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
            .map_err(Error::xml)?;
        writer.get_mut().push(b'\n');
        write_element(&mut writer, &self.root)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(Error::xml)
    }
}

fn element_name(start: &BytesStart<'_>) -> Result<String> {
    let name = start.name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_string)
        .map_err(Error::xml)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(Error::invalid_document("more than one root element")),
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let name = element.name.as_str();
    if element.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(Error::xml)?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(Error::xml)?;
    if !element.text.is_empty() {
        if !is_valid_text(&element.text) {
            return Err(Error::InvalidText {
                text: element.text.clone(),
            });
        }
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(Error::xml)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(Error::xml)?;
    Ok(())
}
