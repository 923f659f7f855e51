//! Inline `style` attributes are blocked by a strict Content-Security-Policy,
//! but assignments through the CSSOM are not. These helpers split a style
//! string into individual declarations so they can be applied one by one.

/// Whether a `setAttribute` call must be routed through the CSSOM.
#[must_use]
pub fn is_style_attribute(name: &str) -> bool {
    name.eq_ignore_ascii_case("style")
}

/// `font-size` -> `fontSize`.
#[must_use]
pub fn camelize(property: &str) -> String {
    let mut words = property.split('-');
    let mut camel = words.next().unwrap_or_default().to_string();
    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            camel.extend(first.to_uppercase());
            camel.push_str(chars.as_str());
        }
    }
    camel
}

/// Splits `"a-b: c; d: e"` into `[("aB", "c"), ("d", "e")]`.
///
/// Declarations without a colon are dropped. Only the first colon splits, so
/// values such as `url(http://x)` survive.
#[must_use]
pub fn parse_inline_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .map(|(property, value)| (camelize(property.trim()), value.trim().to_string()))
        .filter(|(property, _)| !property.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_style_goes_through_cssom() {
        assert!(is_style_attribute("style"));
        assert!(is_style_attribute("STYLE"));
        assert!(!is_style_attribute("class"));
        assert!(!is_style_attribute("data-style"));
        assert!(!is_style_attribute(""));
    }

    #[test]
    fn camelize_joins_dashed_words() {
        assert_eq!(camelize("font-size"), "fontSize");
        assert_eq!(camelize("border-top-left-radius"), "borderTopLeftRadius");
        assert_eq!(camelize("color"), "color");
    }

    #[test]
    fn parse_splits_declarations() {
        assert_eq!(
            parse_inline_style("display: none; margin-top:3px ;"),
            vec![
                ("display".to_string(), "none".to_string()),
                ("marginTop".to_string(), "3px".to_string()),
            ]
        );
    }

    #[test]
    fn parse_skips_declarations_without_colon() {
        assert_eq!(
            parse_inline_style("garbage; width: 10px"),
            vec![("width".to_string(), "10px".to_string())]
        );
        assert!(parse_inline_style("").is_empty());
    }

    #[test]
    fn parse_keeps_colons_in_values() {
        assert_eq!(
            parse_inline_style("background-image: url(https://x.org/a.png)"),
            vec![(
                "backgroundImage".to_string(),
                "url(https://x.org/a.png)".to_string()
            )]
        );
    }
}
