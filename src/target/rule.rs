//! CSS style rules.

use std::fmt;

use crate::markup::split_declarations;

/// A CSS style rule: a selector and its ordered declarations.
///
/// Only what theming needs is modelled. Values are kept as written, except
/// that a trailing `!important` is held apart as the declaration's priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRule {
    pub selector: String,
    declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Declaration {
    name: String,
    value: String,
    important: bool,
}

impl StyleRule {
    /// Creates a rule with no declarations.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: Vec::new(),
        }
    }

    /// Parses `selector { name: value; ... }`.
    ///
    /// Returns `None` when the braces are missing. Separators inside quotes
    /// and parentheses do not split declarations, so data URIs are safe.
    pub fn parse(css: &str) -> Option<Self> {
        let open = css.find('{')?;
        let close = css.rfind('}')?;
        if close < open {
            return None;
        }

        let mut rule = Self::new(css[..open].trim());
        for declaration in split_declarations(&css[open + 1..close]) {
            if let Some((name, value)) = declaration.split_once(':') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                let (value, important) = split_priority(value.trim());
                rule.set_property(name, value);
                rule.set_important(name, important);
            }
        }
        Some(rule)
    }

    /// Adds or replaces a declaration, builder style.
    pub fn with_property(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_property(name, value);
        self
    }

    /// Returns a property value, without its priority.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.find(name).map(|d| d.value.as_str())
    }

    /// Returns whether a property is declared `!important`.
    pub fn is_important(&self, name: &str) -> bool {
        self.find(name).is_some_and(|d| d.important)
    }

    /// Sets a property, keeping its position and priority if it already
    /// exists.
    pub fn set_property(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match self.declarations.iter_mut().find(|d| d.name == name) {
            Some(entry) => entry.value = value,
            None => self.declarations.push(Declaration {
                name,
                value,
                important: false,
            }),
        }
    }

    /// Sets the priority of an existing property.
    pub fn set_important(&mut self, name: &str, important: bool) {
        let name = name.to_ascii_lowercase();
        if let Some(entry) = self.declarations.iter_mut().find(|d| d.name == name) {
            entry.important = important;
        }
    }

    /// Iterates over `(property, value)` pairs in order.
    pub fn declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|d| (d.name.as_str(), d.value.as_str()))
    }

    fn find(&self, name: &str) -> Option<&Declaration> {
        let name = name.to_ascii_lowercase();
        self.declarations.iter().find(|d| d.name == name)
    }
}

/// Splits a trailing `! important` (any case, optional inner space) off a
/// value.
fn split_priority(value: &str) -> (&str, bool) {
    const IMPORTANT: &str = "important";

    let Some(at) = value.len().checked_sub(IMPORTANT.len()) else {
        return (value, false);
    };
    if !value.is_char_boundary(at) || !value[at..].eq_ignore_ascii_case(IMPORTANT) {
        return (value, false);
    }
    match value[..at].trim_end().strip_suffix('!') {
        Some(rest) => (rest.trim_end(), true),
        None => (value, false),
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.selector)?;
        for d in &self.declarations {
            write!(f, " {}: {}", d.name, d.value)?;
            if d.important {
                f.write_str(" !important")?;
            }
            f.write_str(";")?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rule_with_data_uri() {
        let css = r#".icon { Background-Image: url("data:image/svg+xml;base64,PHN2Zz48L3N2Zz4="); color: red }"#;
        let rule = StyleRule::parse(css).unwrap();
        assert_eq!(rule.selector, ".icon");
        assert_eq!(
            rule.property("background-image"),
            Some(r#"url("data:image/svg+xml;base64,PHN2Zz48L3N2Zz4=")"#)
        );
        assert_eq!(rule.property("color"), Some("red"));
        assert_eq!(rule.declarations().count(), 2);
    }

    #[test]
    fn display_roundtrip() {
        let rule = StyleRule::new("li").with_property("list-style-image", r#"url("a.svg")"#);
        let text = rule.to_string();
        assert_eq!(text, r#"li { list-style-image: url("a.svg"); }"#);
        assert_eq!(StyleRule::parse(&text), Some(rule));
    }

    #[test]
    fn parse_requires_braces() {
        assert!(StyleRule::parse("color: red").is_none());
        assert!(StyleRule::parse("} a {").is_none());
    }

    #[test]
    fn important_priority_is_kept_apart() {
        let css = r#".a { background-image: url("data:image/svg+xml,%3Csvg%3E%3C/svg%3E") !important; color: red ! IMPORTANT; content: "!important" }"#;
        let mut rule = StyleRule::parse(css).unwrap();

        assert_eq!(
            rule.property("background-image"),
            Some(r#"url("data:image/svg+xml,%3Csvg%3E%3C/svg%3E")"#)
        );
        assert!(rule.is_important("background-image"));
        assert_eq!(rule.property("color"), Some("red"));
        assert!(rule.is_important("color"));
        assert_eq!(rule.property("content"), Some(r#""!important""#));
        assert!(!rule.is_important("content"));

        rule.set_property("background-image", "none");
        assert!(rule.is_important("background-image"));
        assert_eq!(
            rule.to_string(),
            r#".a { background-image: none !important; color: red !important; content: "!important"; }"#
        );
    }
}
