//! HTML escaping.
//!
//! Every rule that embeds literal user content (code, URLs, alt text)
//! passes it through [`escape_html`] first. There is deliberately no
//! inverse: output is never parsed back.

/// Escape text for safe inclusion in HTML content or attribute values.
///
/// Replaces `&`, `<`, `>`, `"` and `'`, with `&` handled first so the
/// entities introduced for the others are not themselves re-escaped.
///
/// Escaping is not idempotent: escaping already-escaped text escapes the
/// `&` of every entity again.
///
/// # Examples
///
/// ```
/// use afmdocs_core::escape_html;
///
/// assert_eq!(escape_html("a < b && c"), "a &lt; b &amp;&amp; c");
/// assert_eq!(escape_html(&escape_html("<")), "&amp;lt;");
/// ```
pub fn escape_html(text: &str) -> String {
    if !needs_escape(text) {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + text.len() / 8);

    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }

    result
}

/// Check whether text contains any character [`escape_html`] would replace.
pub fn needs_escape(text: &str) -> bool {
    text.contains(['&', '<', '>', '"', '\''])
}
