//! Serializable themer configuration.
//!
//! # Example
//!
//! ```
//! use svg_themer::ThemerOptions;
//!
//! let options = ThemerOptions::from_json(r#"{ "baseUrl": "https://example.com/" }"#).unwrap();
//! assert_eq!(options.image_properties[0], "background-image");
//! assert_eq!(options.base_url.as_deref(), Some("https://example.com/"));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// CSS properties scanned, in order, when no property is named.
pub const DEFAULT_IMAGE_PROPERTIES: [&str; 4] = [
    "background-image",
    "list-style-image",
    "border-image",
    "content",
];

/// Settings shared by every call made through a [`Themer`](crate::Themer).
///
/// ```json
/// {
///   "imageProperties": ["background-image", "list-style-image", "border-image", "content"],
///   "baseUrl": "https://example.com/",
///   "fetchTimeoutMs": 5000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemerOptions {
    /// CSS properties that may hold an image `url(...)`, in scan order.
    /// The first property holding an SVG reference wins.
    #[serde(default = "default_image_properties")]
    pub image_properties: Vec<String>,

    /// Base for resolving relative `.svg` URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout for `.svg` fetches. `None` waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_timeout_ms: Option<u64>,
}

impl Default for ThemerOptions {
    fn default() -> Self {
        Self {
            image_properties: default_image_properties(),
            base_url: None,
            fetch_timeout_ms: None,
        }
    }
}

impl ThemerOptions {
    /// Creates options with the default property list and no fetch settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the scanned property list.
    pub fn with_image_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_properties = properties.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the base URL for relative references.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Returns the fetch timeout.
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    /// Serializes the options to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the options to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn default_image_properties() -> Vec<String> {
    DEFAULT_IMAGE_PROPERTIES.iter().map(|s| s.to_string()).collect()
}
