//! Attaching a theming capability to a target.
//!
//! [`bind`] pairs a [`Target`] with an optional theming override and returns
//! a [`BoundTarget`] whose [`set_theme`](BoundTarget::set_theme) dispatches
//! to the matching [`Themer`] entry point.
//!
//! # Example
//!
//! ```
//! use svg_themer::{bind, SvgElement, Target, Theme, Themer};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let themer = Themer::new();
//! let svg = SvgElement::parse("<svg/>").unwrap();
//! let mut bound = bind(svg, None);
//!
//! bound.set_theme(&themer, &Theme::new().with_background_color("gold")).await.unwrap();
//!
//! let Target::Svg(svg) = bound.target() else { unreachable!() };
//! assert_eq!(svg.attribute("style"), Some("fill:gold"));
//! # });
//! ```

use tracing::debug;

use super::{ImageElement, StyleRule};
use crate::error::ThemeError;
use crate::markup::SvgElement;
use crate::theme::{Theme, ThemingFn};
use crate::themer::Themer;

// ============================================================================
// Target
// ============================================================================

/// The three kinds of themable target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// An inline SVG root.
    Svg(SvgElement),
    /// An image element whose `src` may reference an SVG.
    Image(ImageElement),
    /// A style rule whose image properties may reference an SVG.
    Rule(StyleRule),
}

impl Target {
    /// Returns a short name of the variant, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Svg(_) => "svg",
            Self::Image(_) => "img",
            Self::Rule(_) => "rule",
        }
    }
}

impl From<SvgElement> for Target {
    fn from(svg: SvgElement) -> Self {
        Self::Svg(svg)
    }
}

impl From<ImageElement> for Target {
    fn from(img: ImageElement) -> Self {
        Self::Image(img)
    }
}

impl From<StyleRule> for Target {
    fn from(rule: StyleRule) -> Self {
        Self::Rule(rule)
    }
}

// ============================================================================
// BoundTarget
// ============================================================================

/// A target with a theming capability attached.
///
/// The theming function is resolved at call time: a per-call function wins,
/// then the override given to [`bind`], then the themer's default. Without an
/// override, later changes to the themer's default are therefore honored.
#[derive(Debug, Clone)]
pub struct BoundTarget {
    target: Target,
    theming: Option<ThemingFn>,
}

impl BoundTarget {
    /// Returns the target.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Returns the target mutably.
    pub fn target_mut(&mut self) -> &mut Target {
        &mut self.target
    }

    /// Returns the theming override, if one was bound.
    pub fn theming(&self) -> Option<&ThemingFn> {
        self.theming.as_ref()
    }

    /// Detaches the capability and returns the target.
    pub fn into_target(self) -> Target {
        self.target
    }

    /// Applies `theme` with the bound theming function.
    pub async fn set_theme(&mut self, themer: &Themer, theme: &Theme) -> Result<(), ThemeError> {
        self.set_theme_with(themer, theme, None, None).await
    }

    /// Applies `theme`, letting `theming` override the bound function for
    /// this call.
    ///
    /// For a style rule, `property` names the one property to theme; without
    /// it the configured property list is scanned. Other targets ignore it.
    pub async fn set_theme_with(
        &mut self,
        themer: &Themer,
        theme: &Theme,
        theming: Option<&ThemingFn>,
        property: Option<&str>,
    ) -> Result<(), ThemeError> {
        let theming = theming.or(self.theming.as_ref());
        debug!(kind = self.target.kind(), overridden = theming.is_some(), "set_theme");

        match &mut self.target {
            Target::Svg(svg) => {
                themer.apply_to_svg_element(svg, theme, theming);
            }
            Target::Image(img) => {
                themer.apply_to_image_element(img, theme, theming).await?;
            }
            Target::Rule(rule) => {
                themer
                    .apply_to_style_rule(rule, theme, theming, property)
                    .await?;
            }
        }
        Ok(())
    }
}

/// Attaches a theming capability to `target`, optionally overriding the
/// theming function for that target alone.
pub fn bind(target: impl Into<Target>, theming: Option<ThemingFn>) -> BoundTarget {
    BoundTarget {
        target: target.into(),
        theming,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::StubFetcher;

    fn marker(value: &'static str) -> ThemingFn {
        ThemingFn::new(move |root, _| root.set_attribute("data-by", value))
    }

    fn inline_value() -> &'static str {
        r#"url("data:image/svg+xml,%3Csvg%3E%3C/svg%3E")"#
    }

    #[tokio::test]
    async fn svg_without_override_follows_themer_default() {
        let mut themer = Themer::new().with_fetcher(StubFetcher::default());
        let mut bound = bind(SvgElement::parse("<svg/>").unwrap(), None);
        assert!(bound.theming().is_none());

        themer.set_theming(marker("default"));
        bound.set_theme(&themer, &Theme::new()).await.unwrap();

        let Target::Svg(svg) = bound.target() else {
            panic!("expected svg target");
        };
        assert_eq!(svg.attribute("data-by"), Some("default"));
    }

    #[tokio::test]
    async fn bound_override_beats_default_and_call_beats_bound() {
        let themer = Themer::new()
            .with_fetcher(StubFetcher::default())
            .with_theming(marker("default"));
        let mut bound = bind(SvgElement::new("svg"), Some(marker("bound")));

        bound.set_theme(&themer, &Theme::new()).await.unwrap();
        let Target::Svg(svg) = bound.target() else {
            panic!("expected svg target");
        };
        assert_eq!(svg.attribute("data-by"), Some("bound"));

        bound
            .set_theme_with(&themer, &Theme::new(), Some(&marker("call")), None)
            .await
            .unwrap();
        let Target::Svg(svg) = bound.target() else {
            panic!("expected svg target");
        };
        assert_eq!(svg.attribute("data-by"), Some("call"));
    }

    #[tokio::test]
    async fn image_target_dispatches_to_image_entry_point() {
        let themer = Themer::new().with_fetcher(StubFetcher::default());
        let mut bound = bind(
            ImageElement::new("data:image/svg+xml,%3Csvg%3E%3C/svg%3E"),
            Some(marker("img")),
        );

        bound.set_theme(&themer, &Theme::new()).await.unwrap();

        let Target::Image(img) = bound.into_target() else {
            panic!("expected image target");
        };
        assert!(img.src.contains("data-by%3D%22img%22"), "{}", img.src);
    }

    #[tokio::test]
    async fn rule_target_dispatches_to_rule_entry_point() {
        let themer = Themer::new().with_fetcher(StubFetcher::default());
        let rule = StyleRule::new(".x").with_property("content", inline_value());
        let mut bound = bind(rule, None);

        bound
            .set_theme(&themer, &Theme::new().with_color("teal"))
            .await
            .unwrap();

        let Target::Rule(rule) = bound.target() else {
            panic!("expected rule target");
        };
        assert!(rule.property("content").unwrap().contains("stroke%3Ateal"));
    }

    #[tokio::test]
    async fn rule_target_honors_named_property() {
        let themer = Themer::new().with_fetcher(StubFetcher::default());
        let rule = StyleRule::new(".x")
            .with_property("background-image", inline_value())
            .with_property("content", inline_value());
        let mut bound = bind(rule, Some(marker("rule")));

        bound
            .set_theme_with(&themer, &Theme::new(), None, Some("content"))
            .await
            .unwrap();

        let Target::Rule(rule) = bound.target() else {
            panic!("expected rule target");
        };
        assert_eq!(rule.property("background-image"), Some(inline_value()));
        assert!(rule.property("content").unwrap().contains("data-by%3D%22rule%22"));
    }

    #[tokio::test]
    async fn image_fetch_failure_surfaces_and_keeps_target() {
        let themer = Themer::new()
            .with_fetcher(StubFetcher::default().with_response("/a.svg", 500, ""));
        let mut bound = bind(ImageElement::new("/a.svg"), None);

        assert!(bound.set_theme(&themer, &Theme::new()).await.is_err());
        assert_eq!(*bound.target(), Target::Image(ImageElement::new("/a.svg")));
    }

    #[test]
    fn target_kinds() {
        assert_eq!(Target::from(SvgElement::new("svg")).kind(), "svg");
        assert_eq!(Target::from(ImageElement::default()).kind(), "img");
        assert_eq!(Target::from(StyleRule::new("a")).kind(), "rule");
    }
}
