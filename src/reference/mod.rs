//! Locating SVG references inside attribute and CSS values.
//!
//! Two syntactic forms are recognized:
//!
//! ```text
//! DataUri:  data:image/svg+xml[;TOKEN],PAYLOAD    | ANYTHING.svg
//! CssUrl:   url("data:image/svg+xml[;TOKEN],PAYLOAD") | url("ANYTHING.svg")
//! ```
//!
//! `TOKEN` is one or more word characters. The inline alternative is tried
//! first; a value that fits neither is not a reference. Everything around
//! the payload is kept verbatim so it can be written back unchanged.

pub mod codec;

use std::fmt;

/// MIME prefix of an inline SVG data URI.
pub const SVG_DATA_SCHEME: &str = "data:image/svg+xml";

const CSS_URL_OPEN: &str = "url(\"";
const CSS_URL_CLOSE: &str = "\")";

// ============================================================================
// ReferenceForm
// ============================================================================

/// Where a value comes from, which decides its outer syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceForm {
    /// A bare URI, as found in an image element's `src`.
    DataUri,
    /// A CSS `url("...")` value.
    CssUrl,
}

// ============================================================================
// Encoding
// ============================================================================

/// Payload encoding named by the token after the MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    /// No token: literal or percent-escaped markup.
    None,
    /// `;base64`.
    Base64,
    /// Any other token, kept so it can be reported.
    Unrecognized(String),
}

impl Encoding {
    /// Classifies a token, given without its leading `;`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "base64" => Self::Base64,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the literal that precedes the comma, including the `;`.
    pub fn as_token(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Base64 => ";base64".to_string(),
            Self::Unrecognized(token) => format!(";{token}"),
        }
    }
}

// ============================================================================
// Container
// ============================================================================

/// The literal text wrapped around a URI, e.g. `url("` and `")`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    pub prefix: String,
    pub suffix: String,
}

impl Container {
    /// A container with no wrapper text.
    pub fn bare() -> Self {
        Self::default()
    }

    /// The `url("...")` container.
    pub fn css_url() -> Self {
        Self {
            prefix: CSS_URL_OPEN.to_string(),
            suffix: CSS_URL_CLOSE.to_string(),
        }
    }
}

// ============================================================================
// SvgSource
// ============================================================================

/// What sits inside the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgSource {
    /// An inline data URI.
    Inline {
        /// The MIME prefix as written.
        scheme: String,
        encoding: Encoding,
        /// The (possibly encoded) markup after the comma.
        payload: String,
    },
    /// A URL ending in `.svg` that must be fetched first.
    File { url: String },
}

// ============================================================================
// SvgReference
// ============================================================================

/// A located SVG reference.
///
/// Owned by the call that located it; the payload is rewritten in place and
/// [`assemble`](Self::assemble) produces the replacement value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgReference {
    pub container: Container,
    pub source: SvgSource,
}

impl SvgReference {
    /// Builds an inline reference from parts.
    pub fn inline(container: Container, encoding: Encoding, payload: impl Into<String>) -> Self {
        Self {
            container,
            source: SvgSource::Inline {
                scheme: SVG_DATA_SCHEME.to_string(),
                encoding,
                payload: payload.into(),
            },
        }
    }

    /// Returns the URL to fetch, if this is a file reference.
    pub fn source_url(&self) -> Option<&str> {
        match &self.source {
            SvgSource::File { url } => Some(url),
            SvgSource::Inline { .. } => None,
        }
    }

    /// Returns the encoding of an inline reference.
    pub fn encoding(&self) -> Option<&Encoding> {
        match &self.source {
            SvgSource::Inline { encoding, .. } => Some(encoding),
            SvgSource::File { .. } => None,
        }
    }

    /// Replaces a file reference with fetched, unencoded markup.
    pub fn resolve_to_markup(&mut self, markup: impl Into<String>) {
        self.source = SvgSource::Inline {
            scheme: SVG_DATA_SCHEME.to_string(),
            encoding: Encoding::None,
            payload: markup.into(),
        };
    }

    /// Writes the reference back out with its container.
    pub fn assemble(&self) -> String {
        let mut out = String::with_capacity(self.container.prefix.len() + 64);
        out.push_str(&self.container.prefix);
        match &self.source {
            SvgSource::Inline {
                scheme,
                encoding,
                payload,
            } => {
                out.push_str(scheme);
                out.push_str(&encoding.as_token());
                out.push(',');
                out.push_str(payload);
            }
            SvgSource::File { url } => out.push_str(url),
        }
        out.push_str(&self.container.suffix);
        out
    }
}

impl fmt::Display for SvgReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.assemble())
    }
}

// ============================================================================
// Locator
// ============================================================================

/// Finds an SVG reference in `value`.
///
/// Returns `None` when the value does not match the grammar of `form`.
pub fn locate(value: &str, form: ReferenceForm) -> Option<SvgReference> {
    let (container, body) = match form {
        ReferenceForm::DataUri => (Container::bare(), value),
        ReferenceForm::CssUrl => {
            let inner = value
                .strip_prefix(CSS_URL_OPEN)?
                .strip_suffix(CSS_URL_CLOSE)?;
            (Container::css_url(), inner)
        }
    };

    let source = parse_inline(body).or_else(|| parse_file(body))?;
    Some(SvgReference { container, source })
}

fn parse_inline(body: &str) -> Option<SvgSource> {
    let rest = body.strip_prefix(SVG_DATA_SCHEME)?;

    let (encoding, rest) = match rest.strip_prefix(';') {
        Some(after) => {
            let len = after
                .find(|c: char| !is_word_char(c))
                .unwrap_or(after.len());
            if len == 0 {
                return None;
            }
            (Encoding::from_token(&after[..len]), &after[len..])
        }
        None => (Encoding::None, rest),
    };

    let payload = rest.strip_prefix(',')?;
    if has_line_terminator(payload) {
        return None;
    }

    Some(SvgSource::Inline {
        scheme: SVG_DATA_SCHEME.to_string(),
        encoding,
        payload: payload.to_string(),
    })
}

fn parse_file(body: &str) -> Option<SvgSource> {
    if body.ends_with(".svg") && !has_line_terminator(body) {
        Some(SvgSource::File {
            url: body.to_string(),
        })
    } else {
        None
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn has_line_terminator(s: &str) -> bool {
    s.contains(['\n', '\r', '\u{2028}', '\u{2029}'])
}

// ============================================================================
// Tests
// ============================================================================
