//! Theming entry points.

use std::sync::Arc;

use tracing::debug;

use crate::error::{FetchError, ThemeError};
use crate::fetch::{HttpFetcher, SvgFetcher, resolve};
use crate::markup::SvgElement;
use crate::options::ThemerOptions;
use crate::pipeline::theme_reference;
use crate::reference::{ReferenceForm, SvgReference, locate};
use crate::target::{ImageElement, StyleRule};
use crate::theme::{Theme, ThemingFn};

// ============================================================================
// Themer
// ============================================================================

/// Applies themes to SVG elements, image elements and style rules.
///
/// A themer owns the configuration, the fetcher used for `.svg` URLs and the
/// default theming function. Each entry point accepts an optional theming
/// function that takes precedence over the default for that call.
///
/// # Example
///
/// ```
/// use svg_themer::{ImageElement, Theme, Themer};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let themer = Themer::new();
/// let mut img = ImageElement::new("data:image/svg+xml,%3Csvg%3E%3C/svg%3E");
///
/// themer
///     .apply_to_image_element(&mut img, &Theme::new().with_color("red"), None)
///     .await
///     .unwrap();
///
/// assert!(img.src.starts_with("data:image/svg+xml,%3Csvg"));
/// assert!(img.src.contains("stroke%3Ared"));
/// # });
/// ```
#[derive(Clone)]
pub struct Themer {
    options: ThemerOptions,
    fetcher: Arc<dyn SvgFetcher>,
    theming: ThemingFn,
}

impl Themer {
    /// Creates a themer with default options, an HTTP fetcher and
    /// [`default_theming`](crate::default_theming).
    pub fn new() -> Self {
        Self {
            options: ThemerOptions::default(),
            fetcher: Arc::new(HttpFetcher::new()),
            theming: ThemingFn::default(),
        }
    }

    /// Creates a themer whose HTTP fetcher honors the fetch settings in
    /// `options`.
    pub fn with_options(options: ThemerOptions) -> Result<Self, FetchError> {
        let fetcher =
            HttpFetcher::with_options(options.fetch_timeout(), options.base_url.as_deref())?;
        Ok(Self {
            options,
            fetcher: Arc::new(fetcher),
            theming: ThemingFn::default(),
        })
    }

    /// Replaces the fetcher.
    pub fn with_fetcher(mut self, fetcher: impl SvgFetcher + 'static) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    /// Replaces the default theming function.
    pub fn with_theming(mut self, theming: ThemingFn) -> Self {
        self.theming = theming;
        self
    }

    /// Replaces the default theming function in place.
    ///
    /// Bound targets without their own override pick up the change on their
    /// next call.
    pub fn set_theming(&mut self, theming: ThemingFn) {
        self.theming = theming;
    }

    /// Returns the default theming function.
    pub fn theming(&self) -> &ThemingFn {
        &self.theming
    }

    /// Returns the configuration.
    pub fn options(&self) -> &ThemerOptions {
        &self.options
    }

    /// Themes an inline SVG root in place.
    pub fn apply_to_svg_element<'a>(
        &self,
        svg: &'a mut SvgElement,
        theme: &Theme,
        theming: Option<&ThemingFn>,
    ) -> &'a mut SvgElement {
        theming.unwrap_or(&self.theming).apply(svg, theme);
        svg
    }

    /// Themes the SVG referenced by an image element's `src`.
    ///
    /// A `src` that is not an SVG reference is left alone. A `.svg` URL is
    /// fetched first and `src` becomes an inline percent-encoded data URI.
    /// On any error `src` is unchanged.
    pub async fn apply_to_image_element<'a>(
        &self,
        img: &'a mut ImageElement,
        theme: &Theme,
        theming: Option<&ThemingFn>,
    ) -> Result<&'a mut ImageElement, ThemeError> {
        let Some(reference) = locate(&img.src, ReferenceForm::DataUri) else {
            debug!("image source holds no SVG reference");
            return Ok(img);
        };

        img.src = self.theme_located(reference, theme, theming).await?;
        Ok(img)
    }

    /// Themes the SVG referenced by an image-bearing property of a rule.
    ///
    /// With `property` set only that property is examined; otherwise the
    /// configured [`image_properties`](ThemerOptions::image_properties) are
    /// scanned in order and the first holding an SVG reference is used.
    /// A rule without a match is returned unchanged.
    pub async fn apply_to_style_rule<'a>(
        &self,
        rule: &'a mut StyleRule,
        theme: &Theme,
        theming: Option<&ThemingFn>,
        property: Option<&str>,
    ) -> Result<&'a mut StyleRule, ThemeError> {
        let Some((name, reference)) = self.find_rule_reference(rule, property) else {
            debug!(selector = %rule.selector, "no SVG reference in rule");
            return Ok(rule);
        };

        debug!(selector = %rule.selector, property = %name, "theming rule property");
        let value = self.theme_located(reference, theme, theming).await?;
        rule.set_property(&name, value);
        Ok(rule)
    }

    fn find_rule_reference(
        &self,
        rule: &StyleRule,
        property: Option<&str>,
    ) -> Option<(String, SvgReference)> {
        match property {
            Some(name) => locate_property(rule, name).map(|r| (name.to_string(), r)),
            None => self.options.image_properties.iter().find_map(|name| {
                locate_property(rule, name).map(|r| (name.clone(), r))
            }),
        }
    }

    async fn theme_located(
        &self,
        mut reference: SvgReference,
        theme: &Theme,
        theming: Option<&ThemingFn>,
    ) -> Result<String, ThemeError> {
        resolve(&mut reference, self.fetcher.as_ref()).await?;
        theme_reference(&mut reference, theme, theming.unwrap_or(&self.theming))
    }
}

impl Default for Themer {
    fn default() -> Self {
        Self::new()
    }
}

fn locate_property(rule: &StyleRule, name: &str) -> Option<SvgReference> {
    locate(rule.property(name)?, ReferenceForm::CssUrl)
}

// ============================================================================
// Tests
// ============================================================================
