//! Markup parsing on top of quick-xml events.

use std::borrow::Cow;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::{Node, SvgElement};
use crate::error::ThemeError;

/// Parses `markup` and returns the first element, with its subtree.
pub(super) fn parse_first_element(markup: &str) -> Result<SvgElement, ThemeError> {
    let mut reader = Reader::from_str(markup);
    // End tags are matched against the open elements below.
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    // Open elements; the first entry is the root once one has started.
    let mut stack: Vec<SvgElement> = Vec::with_capacity(8);

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(e) => {
                stack.push(element_from_start(&reader, &e)?);
            }
            Event::Empty(e) => {
                let element = element_from_start(&reader, &e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None => return Ok(element),
                }
            }
            Event::End(e) => {
                let name = decode(&reader, e.name().as_ref())?.into_owned();
                if let Some(root) = close_until(&mut stack, &name) {
                    return Ok(root);
                }
            }
            Event::Text(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = decode(&reader, &e)?;
                    parent.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::GeneralRef(e) => {
                if let Some(parent) = stack.last_mut() {
                    let name = decode(&reader, &e)?;
                    parent.children.push(Node::Text(format!("&{name};")));
                }
            }
            Event::CData(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = decode(&reader, &e)?;
                    parent.children.push(Node::CData(text.into_owned()));
                }
            }
            Event::Comment(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = decode(&reader, &e)?;
                    parent.children.push(Node::Comment(text.into_owned()));
                }
            }
            Event::PI(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = decode(&reader, &e)?;
                    parent
                        .children
                        .push(Node::ProcessingInstruction(text.into_owned()));
                }
            }
            Event::Eof => return close_open_elements(stack),
            _ => {}
        }
    }
}

/// Closes the innermost open element named `name` along with everything
/// opened inside it. An end tag matching nothing open is ignored. Returns the
/// root once it is closed.
fn close_until(stack: &mut Vec<SvgElement>, name: &str) -> Option<SvgElement> {
    let depth = stack.iter().rposition(|el| el.name() == name)?;
    while stack.len() > depth {
        let element = stack.pop()?;
        match stack.last_mut() {
            Some(parent) => parent.children.push(Node::Element(element)),
            None => return Some(element),
        }
    }
    None
}

/// Closes elements still open at end of input, the way an HTML fragment
/// parser would, and returns the root.
fn close_open_elements(mut stack: Vec<SvgElement>) -> Result<SvgElement, ThemeError> {
    while let Some(element) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(Node::Element(element)),
            None => return Ok(element),
        }
    }
    Err(ThemeError::NoRootElement)
}

fn element_from_start(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<SvgElement, ThemeError> {
    let qname = start.name();
    let name = decode(reader, qname.as_ref())?.into_owned();
    let mut element = SvgElement::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| ThemeError::Decode(format!("attribute: {e}")))?;
        let key = decode(reader, attr.key.as_ref())?;
        let raw = decode(reader, attr.value.as_ref())?;
        let value = unescape(&raw)
            .map_err(|e| ThemeError::Decode(format!("attribute value: {e}")))?;
        element.set_attribute(&key, value.into_owned());
    }

    Ok(element)
}

fn decode<'b>(reader: &Reader<&[u8]>, bytes: &'b [u8]) -> Result<Cow<'b, str>, ThemeError> {
    reader
        .decoder()
        .decode(bytes)
        .map_err(|e| ThemeError::Decode(format!("markup text: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_prolog_and_returns_first_element() {
        let markup = r#"<?xml version="1.0"?>
<!DOCTYPE svg>
<!-- generator -->
<svg width="10"><rect/></svg><svg width="20"/>"#;
        let svg = parse_first_element(markup).unwrap();
        assert_eq!(svg.name(), "svg");
        assert_eq!(svg.attribute("width"), Some("10"));
        assert_eq!(svg.child_elements().count(), 1);
    }

    #[test]
    fn self_closing_root() {
        let svg = parse_first_element(r#"<svg viewBox="0 0 1 1"/>"#).unwrap();
        assert_eq!(svg.attribute("viewBox"), Some("0 0 1 1"));
        assert!(svg.children.is_empty());
    }

    #[test]
    fn attribute_entities_are_unescaped() {
        let svg = parse_first_element(r#"<svg aria-label="a &amp; b"/>"#).unwrap();
        assert_eq!(svg.attribute("aria-label"), Some("a & b"));
    }

    #[test]
    fn empty_input_has_no_root() {
        assert!(matches!(
            parse_first_element("   "),
            Err(ThemeError::NoRootElement)
        ));
        assert!(matches!(
            parse_first_element("<!-- only a comment -->"),
            Err(ThemeError::NoRootElement)
        ));
    }

    #[test]
    fn unclosed_elements_are_closed_by_an_outer_end_tag() {
        let svg = parse_first_element(r#"<svg><g><path d="M0 0"></svg>"#).unwrap();
        let g = svg.child_elements().next().unwrap();
        assert_eq!(g.name(), "g");
        let path = g.child_elements().next().unwrap();
        assert_eq!(path.attribute("d"), Some("M0 0"));
    }

    #[test]
    fn stray_end_tags_are_ignored() {
        let svg = parse_first_element("<svg></g><rect/></svg>").unwrap();
        assert_eq!(svg.child_elements().count(), 1);
    }

    #[test]
    fn broken_syntax_is_rejected() {
        assert!(matches!(
            parse_first_element("<svg><rect x=\"1></svg>"),
            Err(ThemeError::Markup(_))
        ));
    }
}
