//! The decode, theme, encode transform.

use tracing::debug;

use crate::error::ThemeError;
use crate::markup::SvgElement;
use crate::reference::codec::{decode_payload, encode_payload};
use crate::reference::{SvgReference, SvgSource};
use crate::theme::{Theme, ThemingFn};

/// Applies `theming` to the SVG carried by an inline reference and returns
/// the reassembled value.
///
/// The payload is decoded according to its encoding, parsed, themed,
/// serialized and encoded again with the same encoding; plain payloads are
/// always percent-encoded on the way out. The container, scheme, encoding
/// token and comma are written back unchanged.
///
/// A file reference must be resolved first; passing one returns it as is.
pub fn theme_reference(
    reference: &mut SvgReference,
    theme: &Theme,
    theming: &ThemingFn,
) -> Result<String, ThemeError> {
    let SvgSource::Inline {
        encoding, payload, ..
    } = &mut reference.source
    else {
        return Ok(reference.assemble());
    };

    let markup = decode_payload(encoding, payload)?;
    let mut root = SvgElement::parse(&markup)?;
    theming.apply(&mut root, theme);
    let themed = root.to_markup();

    debug!(encoding = ?encoding, bytes = themed.len(), "re-encoding themed SVG");
    *payload = encode_payload(encoding, &themed)?;

    Ok(reference.assemble())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::codec::percent_decode;
    use crate::reference::{Encoding, ReferenceForm, locate};
    use base64::{Engine as _, prelude::BASE64_STANDARD};

    fn no_op() -> ThemingFn {
        ThemingFn::new(|_, _| {})
    }

    fn red() -> Theme {
        Theme::new().with_color("red")
    }

    #[test]
    fn percent_encoded_data_uri_is_themed() {
        let mut reference =
            locate("data:image/svg+xml,%3Csvg%3E%3C/svg%3E", ReferenceForm::DataUri).unwrap();
        let out = theme_reference(&mut reference, &red(), &ThemingFn::default()).unwrap();

        let payload = out.strip_prefix("data:image/svg+xml,").unwrap();
        assert!(!payload.contains('<'));
        let markup = percent_decode(payload).unwrap();
        assert!(markup.contains(r#"style="stroke:red;color:red""#), "{markup}");
        assert!(markup.starts_with("<svg "));
    }

    #[test]
    fn literal_markup_is_encoded_on_output() {
        let mut reference =
            locate("data:image/svg+xml,<svg width='2'/>", ReferenceForm::DataUri).unwrap();
        let out = theme_reference(&mut reference, &Theme::new(), &no_op()).unwrap();
        assert_eq!(
            out,
            "data:image/svg+xml,%3Csvg%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%20width%3D%222%22%2F%3E"
        );
    }

    #[test]
    fn base64_css_url_stays_wrapped_and_encoded() {
        let value = r#"url("data:image/svg+xml;base64,PHN2Zz48L3N2Zz4=")"#;
        let mut reference = locate(value, ReferenceForm::CssUrl).unwrap();
        let out = theme_reference(&mut reference, &red(), &ThemingFn::default()).unwrap();

        let payload = out
            .strip_prefix(r#"url("data:image/svg+xml;base64,"#)
            .and_then(|rest| rest.strip_suffix(r#"")"#))
            .unwrap();
        let markup = String::from_utf8(BASE64_STANDARD.decode(payload).unwrap()).unwrap();
        assert!(markup.contains("stroke:red;color:red"));
        assert_eq!(reference.encoding(), Some(&Encoding::Base64));
    }

    #[test]
    fn no_op_theming_preserves_container_literals() {
        let cases = [
            (r#"url("data:image/svg+xml;base64,PHN2Zz48L3N2Zz4=")"#, ReferenceForm::CssUrl),
            (r#"url("data:image/svg+xml,%3Csvg%3E%3C/svg%3E")"#, ReferenceForm::CssUrl),
            ("data:image/svg+xml;base64,PHN2Zz48L3N2Zz4=", ReferenceForm::DataUri),
            ("data:image/svg+xml,<svg/>", ReferenceForm::DataUri),
        ];
        for (value, form) in cases {
            let mut reference = locate(value, form).unwrap();
            let out = theme_reference(&mut reference, &red(), &no_op()).unwrap();
            let comma = value.find(',').unwrap();
            assert_eq!(&out[..=comma], &value[..=comma], "{value}");
            if form == ReferenceForm::CssUrl {
                assert!(out.ends_with(r#"")"#));
            }
        }
    }

    #[test]
    fn attributes_survive_reencoding_for_each_encoding() {
        let markup = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 8 8"><path d="M0 0L8 8" stroke-linecap="round"/></svg>"#;
        let values = [
            format!("data:image/svg+xml,{markup}"),
            format!("data:image/svg+xml,{}", crate::reference::codec::percent_encode(markup)),
            format!("data:image/svg+xml;base64,{}", BASE64_STANDARD.encode(markup)),
        ];
        for value in values {
            let mut reference = locate(&value, ReferenceForm::DataUri).unwrap();
            let encoding = reference.encoding().cloned().unwrap();
            theme_reference(&mut reference, &Theme::new(), &ThemingFn::default()).unwrap();

            let SvgSource::Inline { payload, .. } = &reference.source else {
                panic!("expected inline reference");
            };
            let decoded = match encoding {
                Encoding::Base64 => decode_payload(&Encoding::Base64, payload).unwrap(),
                _ => percent_decode(payload).unwrap(),
            };
            assert_eq!(
                SvgElement::parse(&decoded).unwrap(),
                SvgElement::parse(markup).unwrap()
            );
        }
    }

    #[test]
    fn unknown_encoding_aborts() {
        let mut reference =
            SvgReference::inline(Default::default(), Encoding::Unrecognized("deflate".into()), "eJwr");
        let before = reference.clone();
        let err = theme_reference(&mut reference, &red(), &ThemingFn::default()).unwrap_err();
        assert!(matches!(err, ThemeError::UnexpectedEncoding(_)));
        assert_eq!(reference, before);
    }

    #[test]
    fn markup_without_element_is_an_error() {
        let mut reference = locate("data:image/svg+xml,just text", ReferenceForm::DataUri).unwrap();
        assert!(matches!(
            theme_reference(&mut reference, &red(), &ThemingFn::default()),
            Err(ThemeError::NoRootElement)
        ));
    }

    #[test]
    fn themed_output_is_renderable() {
        use resvg::usvg::{Options, Tree};

        let markup = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10"/></svg>"#;
        let mut reference = SvgReference::inline(Default::default(), Encoding::Base64, BASE64_STANDARD.encode(markup));
        theme_reference(
            &mut reference,
            &Theme::new().with_color("#00ff00").with_background_color("#0000ff"),
            &ThemingFn::default(),
        )
        .unwrap();

        let SvgSource::Inline { payload, .. } = &reference.source else {
            panic!("expected inline reference");
        };
        let themed = decode_payload(&Encoding::Base64, payload).unwrap();
        let tree = Tree::from_str(&themed, &Options::default()).unwrap();
        assert_eq!(tree.size().width(), 10.0);
    }
}
