//! svg-themer: recolor SVGs wherever a page references them
//!
//! This crate rewrites the stroke, fill or any other themable attribute of
//! SVG markup found in three places:
//!
//! - inline SVG roots ([`SvgElement`])
//! - image elements whose `src` is an SVG data URI or a `.svg` URL ([`ImageElement`])
//! - CSS rules whose image properties hold `url("...")` to an SVG ([`StyleRule`])
//!
//! The referenced markup is decoded (plain, percent-escaped or base64),
//! handed to a theming function, serialized and re-encoded into exactly the
//! slot it came from. `.svg` URLs are fetched first and inlined.
//!
//! # Example
//!
//! ```
//! use svg_themer::{StyleRule, Theme, Themer};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let themer = Themer::new();
//! let mut rule = StyleRule::parse(
//!     r#".icon { background-image: url("data:image/svg+xml;base64,PHN2Zz48L3N2Zz4="); }"#,
//! )
//! .unwrap();
//!
//! themer
//!     .apply_to_style_rule(&mut rule, &Theme::new().with_color("red"), None, None)
//!     .await
//!     .unwrap();
//!
//! let value = rule.property("background-image").unwrap();
//! assert!(value.starts_with(r#"url("data:image/svg+xml;base64,"#));
//! # });
//! ```
//!
//! # Custom theming
//!
//! ```
//! use svg_themer::{bind, SvgElement, Theme, Themer, ThemingFn};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let outline = ThemingFn::new(|root, theme| {
//!     if let Some(color) = &theme.color {
//!         root.set_attribute("stroke", color.as_str());
//!         root.set_attribute("fill", "none");
//!     }
//! });
//!
//! let mut bound = bind(SvgElement::parse("<svg/>").unwrap(), Some(outline));
//! bound.set_theme(&Themer::new(), &Theme::new().with_color("navy")).await.unwrap();
//! # });
//! ```

mod error;
mod fetch;
mod markup;
mod options;
mod pipeline;
mod reference;
mod target;
mod theme;
mod themer;

pub use error::{FetchError, ThemeError};
pub use fetch::{FetchResponse, HttpFetcher, SvgFetcher, resolve};
pub use markup::{Node, SVG_NAMESPACE, StyleDeclarations, SvgElement};
pub use options::{DEFAULT_IMAGE_PROPERTIES, ThemerOptions};
pub use pipeline::theme_reference;
pub use reference::codec::{decode_payload, encode_payload, percent_decode, percent_encode};
pub use reference::{
    Container, Encoding, ReferenceForm, SVG_DATA_SCHEME, SvgReference, SvgSource, locate,
};
pub use target::{BoundTarget, ImageElement, StyleRule, Target, bind};
pub use theme::{Theme, ThemingFn, default_theming};
pub use themer::Themer;
