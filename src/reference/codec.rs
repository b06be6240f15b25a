//! Payload decoding and encoding.
//!
//! Outbound plain payloads are always percent-encoded, whether or not they
//! arrived escaped. The unreserved set is the one browsers use for URI
//! components.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{Engine as _, prelude::BASE64_STANDARD};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use super::Encoding;
use crate::error::ThemeError;

/// Characters escaped on output: everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Inbound base64: padding optional, trailing bits ignored.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Marker of percent-escaped markup: an encoded `<`.
const ESCAPED_TAG_OPEN: &str = "%3C";

/// Decodes a payload to markup text.
///
/// - [`Encoding::None`]: percent-decoded if it contains `%3C`, else used as is.
/// - [`Encoding::Base64`]: base64-decoded, unless it already contains `<`.
/// - [`Encoding::Unrecognized`]: always an error.
pub fn decode_payload(encoding: &Encoding, payload: &str) -> Result<String, ThemeError> {
    match encoding {
        Encoding::None if payload.contains(ESCAPED_TAG_OPEN) => percent_decode(payload),
        Encoding::None => Ok(payload.to_string()),
        Encoding::Base64 if payload.contains('<') => Ok(payload.to_string()),
        Encoding::Base64 => base64_decode(payload),
        Encoding::Unrecognized(token) => Err(ThemeError::UnexpectedEncoding(format!(";{token}"))),
    }
}

/// Encodes markup for the given encoding.
pub fn encode_payload(encoding: &Encoding, markup: &str) -> Result<String, ThemeError> {
    match encoding {
        Encoding::None => Ok(percent_encode(markup)),
        Encoding::Base64 => Ok(BASE64_STANDARD.encode(markup)),
        Encoding::Unrecognized(token) => Err(ThemeError::UnexpectedEncoding(format!(";{token}"))),
    }
}

/// Percent-encodes text as a URI component.
pub fn percent_encode(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Percent-decodes text, requiring the result to be UTF-8.
pub fn percent_decode(text: &str) -> Result<String, ThemeError> {
    percent_decode_str(text)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| ThemeError::Decode(format!("percent-decoded payload: {e}")))
}

fn base64_decode(payload: &str) -> Result<String, ThemeError> {
    // ASCII whitespace is tolerated, as in browsers.
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = LENIENT_BASE64
        .decode(compact)
        .map_err(|e| ThemeError::Decode(format!("base64 payload: {e}")))?;
    String::from_utf8(bytes).map_err(|e| ThemeError::Decode(format!("base64 payload: {e}")))
}
