//! Attribute value sanitization.
//!
//! `style`, `class`, `src` and `href` values are rewritten; every other value
//! passes through untouched. All functions here are total: any input string
//! produces some output string.

use crate::encoder::MarkupEncoder;
use crate::policy::Policy;
use once_cell::sync::Lazy;
use regex::Regex;

/// Scheme whose URLs are blanked.
const SCRIPT_SCHEME: &str = "javascript";

// Style values that execute script in some user agents.
static SCRIPTED_STYLE_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)javascript\s*:|vbscript\s*:|expression\s*\(").unwrap()
});

/// Rewrites attribute values according to a [`Policy`].
#[derive(Debug, Clone, Copy)]
pub struct AttributeValueSanitizer<'a> {
    policy: &'a Policy,
}

impl<'a> AttributeValueSanitizer<'a> {
    pub fn new(policy: &'a Policy) -> Self {
        Self { policy }
    }

    /// Sanitize `value` as the value of attribute `name`.
    pub fn sanitize(&self, name: &str, value: &str) -> String {
        if name.eq_ignore_ascii_case("style") && self.policy.filters_styles() {
            self.sanitize_style(value)
        } else if name.eq_ignore_ascii_case("class") && self.policy.filters_classes() {
            self.sanitize_class(value)
        } else if name.eq_ignore_ascii_case("src") || name.eq_ignore_ascii_case("href") {
            Self::sanitize_url(value)
        } else {
            value.to_string()
        }
    }

    /// Keep only whitelisted `prop:value` declarations, each written back as
    /// `prop:value;`. No survivors yields an empty string.
    pub fn sanitize_style(&self, value: &str) -> String {
        let mut out = String::new();
        for declaration in value.split(';') {
            let Some((property, property_value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim().to_lowercase();
            let property_value = property_value.trim();

            if property.is_empty() || !self.policy.is_style_allowed(&property) {
                continue;
            }
            if SCRIPTED_STYLE_VALUE.is_match(property_value) {
                tracing::trace!("Dropped scripted style declaration `{}`", property);
                continue;
            }

            out.push_str(&property);
            out.push(':');
            out.push_str(property_value);
            out.push(';');
        }
        out
    }

    /// Keep whitelisted class tokens in their original order.
    pub fn sanitize_class(&self, value: &str) -> String {
        value
            .split_ascii_whitespace()
            .filter(|token| self.policy.is_class_allowed(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Blank `javascript:` URLs and strip characters that cannot appear in a
    /// URL. Control characters are removed; spaces and non-ASCII characters
    /// are percent-encoded. A valid URL comes back unchanged.
    pub fn sanitize_url(value: &str) -> String {
        let trimmed = value.trim_matches(|c: char| c == ' ' || c.is_ascii_control());

        let mut out = String::with_capacity(trimmed.len());
        for c in trimmed.chars() {
            if c.is_ascii_control() {
                continue;
            }
            if c.is_ascii_graphic() {
                out.push(c);
            } else {
                MarkupEncoder::encode_url_char(c, &mut out);
            }
        }

        match scheme(&out) {
            Some(scheme) if scheme.eq_ignore_ascii_case(SCRIPT_SCHEME) => String::new(),
            _ => out,
        }
    }
}

/// Text before the first `:`, if any.
pub fn scheme(url: &str) -> Option<&str> {
    url.split_once(':').map(|(scheme, _)| scheme)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> Policy {
        Policy::default()
            .with_styles(["color", "font-size"])
            .with_classes(["contain", "sider"])
    }

    #[test]
    fn test_style_keeps_whitelisted_declarations() {
        let policy = Policy::default().with_styles(["color"]);
        let sanitizer = AttributeValueSanitizer::new(&policy);

        assert_eq!(
            sanitizer.sanitize("style", "color: #f00;font-size: 19px;float:right;"),
            "color:#f00;"
        );
    }

    #[test]
    fn test_style_property_is_case_insensitive_value_is_not() {
        let policy = policy();
        let sanitizer = AttributeValueSanitizer::new(&policy);

        assert_eq!(
            sanitizer.sanitize("STYLE", " COLOR : RedDish ; Font-Size:2EM"),
            "color:RedDish;font-size:2EM;"
        );
    }

    #[test]
    fn test_style_with_no_survivors_is_empty() {
        let policy = policy();
        let sanitizer = AttributeValueSanitizer::new(&policy);

        assert_eq!(sanitizer.sanitize("style", "float:right;position:fixed"), "");
        assert_eq!(sanitizer.sanitize("style", ";;"), "");
        assert_eq!(sanitizer.sanitize("style", ""), "");
    }

    #[test]
    fn test_style_drops_declarations_without_value() {
        let policy = policy();
        let sanitizer = AttributeValueSanitizer::new(&policy);

        assert_eq!(sanitizer.sanitize("style", "color;font-size:1px"), "font-size:1px;");
    }

    #[test]
    fn test_style_drops_scripted_values() {
        let policy = policy();
        let sanitizer = AttributeValueSanitizer::new(&policy);

        assert_eq!(
            sanitizer.sanitize("style", "color: expression(alert(1));font-size:1px"),
            "font-size:1px;"
        );
        assert_eq!(sanitizer.sanitize("style", "color:url(JavaScript:alert(1))"), "");
    }

    #[test]
    fn test_style_passthrough_without_whitelist() {
        let policy = Policy::default();
        let sanitizer = AttributeValueSanitizer::new(&policy);

        assert_eq!(sanitizer.sanitize("style", "float: right"), "float: right");
    }

    #[test]
    fn test_class_keeps_input_order() {
        let policy = policy();
        let sanitizer = AttributeValueSanitizer::new(&policy);

        assert_eq!(
            sanitizer.sanitize("class", "sider float-right  contain"),
            "sider contain"
        );
        assert_eq!(sanitizer.sanitize("class", "aabc"), "");
        assert_eq!(sanitizer.sanitize("class", "\tcontain\n"), "contain");
    }

    #[test]
    fn test_class_passthrough_without_whitelist() {
        let policy = Policy::default();
        let sanitizer = AttributeValueSanitizer::new(&policy);

        assert_eq!(sanitizer.sanitize("class", "a  b"), "a  b");
    }

    #[test]
    fn test_javascript_urls_are_blanked() {
        for url in [
            "javascript:alert('XSS')",
            "JavaScript:alert(\"xss\");",
            "  jAvAsCrIpT:void(0)",
            "java\tscript:alert(1)",
            "java\nscript:alert(1)",
            "\u{1}javascript:alert(1)",
        ] {
            assert_eq!(AttributeValueSanitizer::sanitize_url(url), "", "{:?}", url);
        }
    }

    #[test]
    fn test_valid_urls_are_unchanged() {
        for url in [
            "https://example.com/a/b?c=d&e=f#g",
            "/relative/path.png",
            "horse.ogg",
            "mailto:someone@example.com",
            "#anchor",
        ] {
            assert_eq!(AttributeValueSanitizer::sanitize_url(url), url);
        }
    }

    #[test]
    fn test_url_illegal_characters() {
        assert_eq!(
            AttributeValueSanitizer::sanitize_url("/a b/ü.png"),
            "/a%20b/%C3%BC.png"
        );
        assert_eq!(AttributeValueSanitizer::sanitize_url("/a\u{7f}b"), "/ab");
    }

    #[test]
    fn test_url_rules_apply_to_src_and_href_only() {
        let policy = policy();
        let sanitizer = AttributeValueSanitizer::new(&policy);

        assert_eq!(sanitizer.sanitize("HREF", "javascript:x"), "");
        assert_eq!(sanitizer.sanitize("src", "javascript:x"), "");
        assert_eq!(sanitizer.sanitize("title", "javascript:x"), "javascript:x");
    }

    #[test]
    fn test_scheme() {
        assert_eq!(scheme("https://x"), Some("https"));
        assert_eq!(scheme("no-scheme"), None);
    }
}
