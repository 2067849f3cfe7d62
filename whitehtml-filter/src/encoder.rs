/// Markup escaping used when rendering a filtered tree.
pub struct MarkupEncoder;

impl MarkupEncoder {
    /// Escape text content. Quotes are left alone; they are inert outside
    /// attribute values.
    pub fn encode_text(text: &str, out: &mut String) {
        for c in text.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                _ => out.push(c),
            }
        }
    }

    /// Escape a value written inside a double-quoted attribute.
    pub fn encode_attribute(value: &str, out: &mut String) {
        for c in value.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '"' => out.push_str("&quot;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                _ => out.push(c),
            }
        }
    }

    /// Percent-encode one character as its UTF-8 bytes.
    pub fn encode_url_char(c: char, out: &mut String) {
        let mut buf = [0u8; 4];
        for byte in c.encode_utf8(&mut buf).bytes() {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
}
