//! A small mutable element tree for SVG markup.
//!
//! Markup is parsed into an [`SvgElement`] whose attributes and inline style
//! can be edited by a theming function, then serialized back to text.
//! Character data, comments and entity references are carried through
//! verbatim; only attribute values are unescaped for editing.

mod parse;
mod style;

pub use style::StyleDeclarations;

pub(crate) use style::split_declarations;

use std::fmt;

use quick_xml::escape::escape;

use crate::error::ThemeError;

/// Namespace declared on serialized roots that have none.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

// ============================================================================
// Node
// ============================================================================

/// A child of an [`SvgElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(SvgElement),
    /// Character data in its escaped source form (entity references included).
    Text(String),
    /// The contents of a `<![CDATA[...]]>` section.
    CData(String),
    /// The contents of a `<!--...-->` comment.
    Comment(String),
    /// The contents of a `<?...?>` processing instruction.
    ProcessingInstruction(String),
}

// ============================================================================
// SvgElement
// ============================================================================

/// An element with ordered attributes and child nodes.
///
/// Attribute values are held unescaped; the `style` attribute is exposed
/// through [`style`](Self::style) and [`set_style`](Self::set_style).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgElement {
    name: String,
    attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl SvgElement {
    /// Creates an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Parses markup and returns its first element.
    ///
    /// Anything before that element (XML declaration, doctype, comments,
    /// whitespace) and anything after it is discarded.
    pub fn parse(markup: &str) -> Result<Self, ThemeError> {
        parse::parse_first_element(markup)
    }

    /// Returns the qualified tag name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, keeping its position if it already exists.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Iterates over `(name, value)` attribute pairs in order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the parsed inline style.
    pub fn style(&self) -> StyleDeclarations {
        self.attribute("style")
            .map(StyleDeclarations::parse)
            .unwrap_or_default()
    }

    /// Replaces the inline style, dropping the attribute when it is empty.
    pub fn set_style(&mut self, style: &StyleDeclarations) {
        if style.is_empty() {
            self.remove_attribute("style");
        } else {
            self.set_attribute("style", style.to_string());
        }
    }

    /// Sets a single inline style property.
    pub fn set_style_property(&mut self, name: &str, value: impl Into<String>) {
        let mut style = self.style();
        style.set(name, value);
        self.set_style(&style);
    }

    /// Iterates over direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &SvgElement> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Iterates mutably over direct child elements.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut SvgElement> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Serializes this element as a document root.
    ///
    /// An unprefixed root without a default namespace gets the SVG namespace
    /// declared, so the result renders when embedded in a data URI.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        let needs_namespace = !self.name.contains(':') && self.attribute("xmlns").is_none();
        self.write_to(&mut out, needs_namespace);
        out
    }

    fn write_to(&self, out: &mut String, declare_namespace: bool) {
        out.push('<');
        out.push_str(&self.name);
        if declare_namespace {
            out.push_str(" xmlns=\"");
            out.push_str(SVG_NAMESPACE);
            out.push('"');
        }
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_to(out, false),
                Node::Text(text) => out.push_str(text),
                Node::CData(text) => {
                    out.push_str("<![CDATA[");
                    out.push_str(text);
                    out.push_str("]]>");
                }
                Node::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
                Node::ProcessingInstruction(text) => {
                    out.push_str("<?");
                    out.push_str(text);
                    out.push_str("?>");
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl fmt::Display for SvgElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

// ============================================================================
// Tests
// ============================================================================
