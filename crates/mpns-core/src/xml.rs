//! XML character escaping for MPNS payloads.

use std::borrow::Cow;

/// Escape the XML-significant characters of `input`.
///
/// Replaces `&` with `&amp;`, `<` with `&lt;`, `>` with `&gt;` and `"` with
/// `&quot;`. Every character is examined exactly once, which is equivalent to
/// substituting `&` before the others: entities produced for `<`, `>` and `"`
/// are never re-escaped. Inputs that need no escaping (including the empty
/// string) are returned borrowed.
pub fn escape(input: &str) -> Cow<'_, str> {
    let Some(first) = input.find(['&', '<', '>', '"']) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len() + 16);
    out.push_str(&input[..first]);
    for ch in input[first..].chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_passes_through() {
        assert!(matches!(escape(""), Cow::Borrowed("")));
    }

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape("Hi."), Cow::Borrowed("Hi.")));
    }

    #[test]
    fn escapes_each_special_character() {
        assert_eq!(escape(r#"&<>""#), "&amp;&lt;&gt;&quot;");
    }

    #[test]
    fn existing_entity_is_escaped_once() {
        assert_eq!(escape("&amp;"), "&amp;amp;");
        assert_eq!(escape("&lt;b&gt;"), "&amp;lt;b&amp;gt;");
    }

    #[test]
    fn apostrophe_is_left_alone() {
        assert_eq!(escape("it's"), "it's");
    }

    #[test]
    fn mixed_text() {
        assert_eq!(
            escape(r#"Tom & Jerry say "<hi>""#),
            "Tom &amp; Jerry say &quot;&lt;hi&gt;&quot;"
        );
    }

    fn unescape(s: &str) -> String {
        s.replace("&quot;", "\"")
            .replace("&gt;", ">")
            .replace("&lt;", "<")
            .replace("&amp;", "&")
    }

    proptest! {
        #[test]
        fn output_has_no_raw_markup(s in ".*") {
            let escaped = escape(&s);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
        }

        #[test]
        fn unescape_restores_input(s in ".*") {
            prop_assert_eq!(unescape(&escape(&s)), s);
        }
    }
}
