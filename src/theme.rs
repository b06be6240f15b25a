//! Theme descriptors and theming functions.
//!
//! A [`Theme`] is a plain bag of presentation values. A [`ThemingFn`] turns
//! a theme into edits on the root element of an SVG; [`default_theming`]
//! is the stock implementation.
//!
//! # Example
//!
//! ```
//! use svg_themer::{default_theming, SvgElement, Theme};
//!
//! let mut svg = SvgElement::parse("<svg></svg>").unwrap();
//! let theme = Theme::new().with_color("red").with_background_color("white");
//! default_theming(&mut svg, &theme);
//!
//! assert_eq!(svg.attribute("style"), Some("stroke:red;color:red;fill:white"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use palette::Srgb;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::markup::SvgElement;

// ============================================================================
// Theme
// ============================================================================

/// Presentation values handed to a theming function.
///
/// Only `color` and `backgroundColor` are interpreted by [`default_theming`];
/// custom theming functions may read any field from [`extra`](Self::extra).
///
/// ```json
/// { "color": "red", "backgroundColor": "#eeeeee", "strokeWidth": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Stroke (and CSS `color`) value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Fill value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    /// Any further caller-defined fields, of any JSON type.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Theme {
    /// Creates an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stroke color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the fill color.
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Sets the stroke color from an sRGB value, written as `#rrggbb`.
    pub fn with_rgb(self, color: Srgb<u8>) -> Self {
        self.with_color(hex_color(color))
    }

    /// Sets the fill color from an sRGB value, written as `#rrggbb`.
    pub fn with_background_rgb(self, color: Srgb<u8>) -> Self {
        self.with_background_color(hex_color(color))
    }

    /// Sets a caller-defined field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Returns a caller-defined field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Returns a caller-defined field as attribute text: strings as is,
    /// other values in their JSON form. `null` counts as unset.
    pub fn field_text(&self, name: &str) -> Option<String> {
        match self.extra.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Serializes the theme to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a theme from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn hex_color(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

// ============================================================================
// Theming functions
// ============================================================================

/// A theming function: edits an SVG root according to a theme.
///
/// Cloning is cheap, so one function can be shared by many bound targets.
#[derive(Clone)]
pub struct ThemingFn(Arc<dyn Fn(&mut SvgElement, &Theme) + Send + Sync>);

impl ThemingFn {
    /// Wraps a closure.
    pub fn new(f: impl Fn(&mut SvgElement, &Theme) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Applies the function to `root`.
    pub fn apply(&self, root: &mut SvgElement, theme: &Theme) {
        (self.0)(root, theme)
    }
}

impl Default for ThemingFn {
    fn default() -> Self {
        Self::new(default_theming)
    }
}

impl fmt::Debug for ThemingFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ThemingFn(..)")
    }
}

/// The stock theming function.
///
/// `color` sets the `stroke` and `color` style properties; `backgroundColor`
/// sets `fill`. Unset fields leave the element untouched.
pub fn default_theming(root: &mut SvgElement, theme: &Theme) {
    if let Some(color) = &theme.color {
        root.set_style_property("stroke", color.as_str());
        root.set_style_property("color", color.as_str());
    }
    if let Some(background) = &theme.background_color {
        root.set_style_property("fill", background.as_str());
    }
}

// ============================================================================
// Tests
// ============================================================================
