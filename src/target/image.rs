//! Image elements.

/// An image element, reduced to its source URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageElement {
    pub src: String,
}

impl ImageElement {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }
}
