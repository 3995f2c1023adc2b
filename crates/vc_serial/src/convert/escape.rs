//! String escaping for each format.

use alloc::string::String;
use core::fmt::Write;

use crate::config::CsvConfig;

/// Characters that force quoting of a JSV token.
const JSV_RESERVED: &[char] = &['{', '}', '[', ']', ',', ':', '"', '\r', '\n'];

/// Writes `text` as a quoted JSON string.
///
/// Control characters, `"` and `\` are always escaped. `html` escapes
/// `<`, `>` and `&`; `unicode` escapes every non-ASCII character, using
/// surrogate pairs outside the basic plane.
///
/// ```
/// use vc_serial::convert::escape::write_json_string;
///
/// let mut out = String::new();
/// write_json_string(&mut out, "<a href=\"x\">", false, false);
/// assert_eq!(out, r#""<a href=\"x\">""#);
/// ```
pub fn write_json_string(out: &mut String, text: &str, html: bool, unicode: bool) {
    out.push('"');
    let mut start = 0;
    for (index, c) in text.char_indices() {
        let escape: Option<&str> = match c {
            '"' => Some("\\\""),
            '\\' => Some("\\\\"),
            '\n' => Some("\\n"),
            '\r' => Some("\\r"),
            '\t' => Some("\\t"),
            '\u{8}' => Some("\\b"),
            '\u{c}' => Some("\\f"),
            _ => None,
        };
        let needs_hex = escape.is_none()
            && (c < ' '
                || (html && matches!(c, '<' | '>' | '&'))
                || (unicode && !c.is_ascii())
                || matches!(c, '\u{2028}' | '\u{2029}'));
        if escape.is_none() && !needs_hex {
            continue;
        }
        out.push_str(&text[start..index]);
        start = index + c.len_utf8();
        match escape {
            Some(escape) => out.push_str(escape),
            None => {
                let mut units = [0_u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{unit:04x}");
                }
            }
        }
    }
    out.push_str(&text[start..]);
    out.push('"');
}

/// Whether a JSV token must be quoted.
pub fn jsv_needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text == "null"
        || text.contains(JSV_RESERVED)
        || text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
}

/// Writes `text` as a JSV token, quoting only when needed.
///
/// ```
/// use vc_serial::convert::escape::write_jsv_string;
///
/// let mut out = String::new();
/// write_jsv_string(&mut out, "1st");
/// out.push(' ');
/// write_jsv_string(&mut out, "a,\"b\"");
/// assert_eq!(out, r#"1st "a,""b""""#);
/// ```
pub fn write_jsv_string(out: &mut String, text: &str) {
    if !jsv_needs_quotes(text) {
        out.push_str(text);
        return;
    }
    out.push('"');
    for c in text.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}

/// Whether a CSV field must be wrapped in the item delimiter.
pub fn csv_needs_quotes(text: &str, csv: &CsvConfig) -> bool {
    text.contains(['\r', '\n'])
        || (!csv.row_separator.is_empty() && text.contains(csv.row_separator.as_str()))
        || (!csv.item_separator.is_empty() && text.contains(csv.item_separator.as_str()))
        || (!csv.item_delimiter.is_empty() && text.contains(csv.item_delimiter.as_str()))
}

/// Writes a CSV field, doubling embedded delimiters when wrapping.
pub fn write_csv_field(out: &mut String, text: &str, csv: &CsvConfig) {
    if !csv_needs_quotes(text, csv) || csv.item_delimiter.is_empty() {
        out.push_str(text);
        return;
    }
    let delimiter = csv.item_delimiter.as_str();
    out.push_str(delimiter);
    let mut rest = text;
    while let Some(index) = rest.find(delimiter) {
        out.push_str(&rest[..index]);
        out.push_str(delimiter);
        out.push_str(delimiter);
        rest = &rest[index + delimiter.len()..];
    }
    out.push_str(rest);
    out.push_str(delimiter);
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{jsv_needs_quotes, write_csv_field, write_json_string};
    use crate::config::CsvConfig;

    fn json(text: &str, html: bool, unicode: bool) -> String {
        let mut out = String::new();
        write_json_string(&mut out, text, html, unicode);
        out
    }

    #[test]
    fn json_escapes() {
        assert_eq!(json("<script>", false, false), "\"<script>\"");
        assert_eq!(json("</script>", true, false), r#""\u003c/script\u003e""#);
        assert_eq!(json("a\u{1}b\tc", false, false), r#""a\u0001b\tc""#);
        assert_eq!(json("é😀", false, true), r#""\u00e9\ud83d\ude00""#);
        assert_eq!(json("é", false, false), "\"é\"");

        let parsed: String = serde_json::from_str(&json("q\"\\\u{8}\u{2028}", true, true)).unwrap();
        assert_eq!(parsed, "q\"\\\u{8}\u{2028}");
    }

    #[test]
    fn jsv_reserved_characters() {
        assert!(!jsv_needs_quotes("plain text"));
        assert!(jsv_needs_quotes(""));
        assert!(jsv_needs_quotes(" padded"));
        for reserved in ["a{", "a}", "[a", "a]", "a,b", "k:v", "\"", "a\nb"] {
            assert!(jsv_needs_quotes(reserved), "{reserved}");
        }
    }

    #[test]
    fn csv_quoting_follows_separators() {
        let comma = CsvConfig::default();
        let pipe = CsvConfig {
            item_separator: "|".into(),
            ..CsvConfig::default()
        };

        let mut out = String::new();
        write_csv_field(&mut out, "with, comma", &comma);
        assert_eq!(out, "\"with, comma\"");

        out.clear();
        write_csv_field(&mut out, "with, comma", &pipe);
        assert_eq!(out, "with, comma");

        out.clear();
        write_csv_field(&mut out, "between \"quotes\" here", &pipe);
        assert_eq!(out, "\"between \"\"quotes\"\" here\"");

        let multi = CsvConfig {
            item_delimiter: "^~".into(),
            ..CsvConfig::default()
        };
        out.clear();
        write_csv_field(&mut out, "a^~b,c", &multi);
        assert_eq!(out, "^~a^~^~b,c^~");
    }
}
