//! Themable targets and the binding layer.
//!
//! Three kinds of target carry SVG content:
//!
//! - [`SvgElement`](crate::SvgElement): an inline SVG root, themed directly
//! - [`ImageElement`]: its `src` holds a data URI or a `.svg` URL
//! - [`StyleRule`]: an image-bearing property holds `url("...")`
//!
//! [`Target`] unifies them so [`bind`] can attach a theming capability to any
//! of the three.

pub mod binding;
pub mod image;
pub mod rule;

pub use binding::{BoundTarget, Target, bind};
pub use image::ImageElement;
pub use rule::StyleRule;
