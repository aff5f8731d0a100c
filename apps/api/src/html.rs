//! HTML escaping for user-supplied text interpolated into email bodies.
//!
//! Every string that came from a form field must pass through `escape` before
//! landing in markup, so a value like `<script>` renders as literal text.

/// Escapes the five HTML-significant characters. `&` is replaced first so
/// already-produced entities are not escaped twice.
pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_all_five_characters() {
        assert_eq!(
            escape(r#"&<>"'"#),
            "&amp;&lt;&gt;&quot;&#039;".to_string()
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape("Ana da Silva, SP - MG"), "Ana da Silva, SP - MG");
    }

    #[test]
    fn test_markup_becomes_literal() {
        let escaped = escape("<script>alert('x')</script>");
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert_eq!(
            escaped,
            "&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_ampersand_escaped_before_entities() {
        // "&lt;" in the input must stay a literal, not collapse into markup.
        assert_eq!(escape("&lt;"), "&amp;lt;");
    }
}
