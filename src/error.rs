//! Error types for the theming pipeline.

use thiserror::Error;

/// Errors that abort a theming call.
///
/// A target without an SVG reference is not an error: entry points simply
/// return it unchanged.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The reference carries an encoding token other than `;base64`.
    #[error("unexpected encoding \"{0}\"")]
    UnexpectedEncoding(String),

    /// The payload could not be decoded (bad base64, percent escapes or UTF-8).
    #[error("failed to decode payload: {0}")]
    Decode(String),

    /// The decoded markup is not well-formed.
    #[error("malformed SVG markup: {0}")]
    Markup(#[from] quick_xml::Error),

    /// The decoded markup contains no element to theme.
    #[error("markup contains no root element")]
    NoRootElement,

    /// The referenced `.svg` file could not be retrieved.
    #[error("failed to fetch SVG: {0}")]
    Fetch(#[from] FetchError),
}

/// Errors from retrieving a `.svg` file.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with anything but 200.
    #[error("unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    /// The request never produced a response.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The reference could not be turned into an absolute URL.
    #[error("invalid URL \"{0}\"")]
    InvalidUrl(String),
}
