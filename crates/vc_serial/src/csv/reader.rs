//! Row and field splitting.
//!
//! Quoting follows RFC 4180 with a configurable, possibly multi-character
//! delimiter. Fields opening with `[` or `{` extend to the matching close
//! when it exists on the same line, so embedded JSV lists and maps survive
//! unquoted; an unbalanced bracket is kept as literal text.

use alloc::string::String;
use alloc::vec::Vec;

use crate::config::CsvConfig;

/// Splits `text` into rows.
///
/// Row separators inside quoted fields do not end a row, a bare `\n` is
/// accepted as a separator, and empty rows are dropped.
///
/// ```
/// use vc_serial::config::CsvConfig;
/// use vc_serial::csv::parse_lines;
///
/// let rows = parse_lines("a,b\r\n\"multi\nline\",c\n\nd,e", &CsvConfig::default());
/// assert_eq!(rows, ["a,b", "\"multi\nline\",c", "d,e"]);
/// ```
pub fn parse_lines(text: &str, csv: &CsvConfig) -> Vec<String> {
    let delimiter = csv.item_delimiter.as_str();
    let separator = csv.item_separator.as_str();
    let row_separator = csv.row_separator.as_str();

    let mut lines = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    let mut in_quotes = false;

    let mut push = |line: &str| {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !line.is_empty() {
            lines.push(String::from(line));
        }
    };

    while pos < text.len() {
        let rest = &text[pos..];
        if !delimiter.is_empty() && rest.starts_with(delimiter) {
            if in_quotes {
                if rest[delimiter.len()..].starts_with(delimiter) {
                    pos += delimiter.len() * 2;
                    continue;
                }
                in_quotes = false;
            } else if pos == start || (!separator.is_empty() && text[start..pos].ends_with(separator)) {
                in_quotes = true;
            }
            pos += delimiter.len();
            continue;
        }
        if !in_quotes {
            if !row_separator.is_empty() && rest.starts_with(row_separator) {
                push(&text[start..pos]);
                pos += row_separator.len();
                start = pos;
                continue;
            }
            if rest.starts_with('\n') {
                push(&text[start..pos]);
                pos += 1;
                start = pos;
                continue;
            }
        }
        pos += rest.chars().next().map_or(1, char::len_utf8);
    }
    push(&text[start..]);
    lines
}

/// Splits one row into fields.
///
/// An unquoted empty field is `None`; a quoted empty field is `Some("")`.
/// A trailing separator adds a final `None`.
///
/// ```
/// use vc_serial::config::CsvConfig;
/// use vc_serial::csv::parse_fields;
///
/// let csv = CsvConfig::default();
/// let fields = parse_fields(r#"1,"a ""b""",,"",[x,y],"#, &csv);
/// assert_eq!(fields, [
///     Some("1".into()), Some("a \"b\"".into()), None, Some("".into()), Some("[x,y]".into()), None,
/// ]);
/// assert_eq!(parse_fields("{A,B", &csv), [Some("{A".into()), Some("B".into())]);
/// ```
pub fn parse_fields(line: &str, csv: &CsvConfig) -> Vec<Option<String>> {
    let mut fields = Vec::new();
    if line.is_empty() {
        return fields;
    }
    let mut reader = FieldReader { line, csv, pos: 0 };
    loop {
        fields.push(reader.read_field());
        if !reader.eat_separator() {
            return fields;
        }
        if reader.pos >= line.len() {
            fields.push(None);
            return fields;
        }
    }
}

struct FieldReader<'a> {
    line: &'a str,
    csv: &'a CsvConfig,
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn eat_separator(&mut self) -> bool {
        let separator = self.csv.item_separator.as_str();
        if !separator.is_empty() && self.rest().starts_with(separator) {
            self.pos += separator.len();
            return true;
        }
        false
    }

    /// Byte offset of the next separator at or after `from`, or the end.
    fn next_separator(&self, from: usize) -> usize {
        let separator = self.csv.item_separator.as_str();
        if separator.is_empty() {
            return self.line.len();
        }
        self.line[from..].find(separator).map_or(self.line.len(), |i| from + i)
    }

    fn read_field(&mut self) -> Option<String> {
        let delimiter = self.csv.item_delimiter.as_str();
        if !delimiter.is_empty() && self.rest().starts_with(delimiter) {
            return Some(self.read_quoted());
        }
        let end = match self.rest().as_bytes().first() {
            Some(b'[') => self.bracket_end(b'[', b']'),
            Some(b'{') => self.bracket_end(b'{', b'}'),
            _ => None,
        }
        .map_or_else(|| self.next_separator(self.pos), |close| self.next_separator(close));

        let text = &self.line[self.pos..end];
        self.pos = end;
        (!text.is_empty()).then(|| String::from(text))
    }

    /// Index after the bracket closing the one at `pos`, if it closes.
    fn bracket_end(&self, open: u8, close: u8) -> Option<usize> {
        let bytes = self.line.as_bytes();
        let mut depth = 0_usize;
        let mut in_quotes = false;
        for (index, &byte) in bytes.iter().enumerate().skip(self.pos) {
            match byte {
                b'"' => in_quotes = !in_quotes,
                _ if in_quotes => {}
                b if b == open => depth += 1,
                b if b == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index + 1);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn read_quoted(&mut self) -> String {
        let delimiter = self.csv.item_delimiter.as_str();
        self.pos += delimiter.len();
        let mut out = String::new();
        loop {
            let rest = self.rest();
            let Some(index) = rest.find(delimiter) else {
                // unterminated: keep the remainder as written
                out.push_str(rest);
                self.pos = self.line.len();
                return out;
            };
            out.push_str(&rest[..index]);
            self.pos += index + delimiter.len();
            if self.rest().starts_with(delimiter) {
                out.push_str(delimiter);
                self.pos += delimiter.len();
                continue;
            }
            let end = self.next_separator(self.pos);
            out.push_str(&self.line[self.pos..end]);
            self.pos = end;
            return out;
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{parse_fields, parse_lines};
    use crate::config::CsvConfig;

    fn fields(line: &str) -> Vec<Option<String>> {
        parse_fields(line, &CsvConfig::default())
    }

    fn some(items: &[&str]) -> Vec<Option<String>> {
        items.iter().map(|s| Some(String::from(*s))).collect()
    }

    #[test]
    fn brackets_are_heuristic() {
        assert_eq!(fields("{A,B"), some(&["{A", "B"]));
        assert_eq!(fields("[{A],B"), some(&["[{A]", "B"]));
        assert_eq!(fields("[A},B"), some(&["[A}", "B"]));
        assert_eq!(fields("[[A],B"), some(&["[[A]", "B"]));
        assert_eq!(fields("A],B"), some(&["A]", "B"]));
        assert_eq!(fields("{A:1,B:[2,3]},x"), some(&["{A:1,B:[2,3]}", "x"]));
        assert_eq!(fields("[\"a,]\",b],c"), some(&["[\"a,]\",b]", "c"]));
    }

    #[test]
    fn empty_fields() {
        assert_eq!(fields(",a,"), [None, Some("a".into()), None]);
        assert_eq!(fields("\"\""), [Some(String::new())]);
        assert!(fields("").is_empty());
    }

    #[test]
    fn custom_separators() {
        let csv = CsvConfig {
            item_separator: "|".into(),
            item_delimiter: "~~".into(),
            row_separator: "\n".into(),
            omit_headers: false,
        };
        assert_eq!(parse_fields("~~a|b~~~~c~~|d,e", &csv), some(&["a|b~~c", "d,e"]));
        assert_eq!(parse_lines("~~x\ny~~|1\n2|3\n", &csv), ["~~x\ny~~|1", "2|3"]);
    }

    #[test]
    fn quoted_rows_span_lines() {
        let csv = CsvConfig::default();
        let lines = parse_lines("id,text\r\n1,\"a\r\nb\"\r\n2,\"c,\"\"d\"\"\"\r\n", &csv);
        assert_eq!(lines.len(), 3);
        assert_eq!(parse_fields(&lines[1], &csv), some(&["1", "a\r\nb"]));
        assert_eq!(parse_fields(&lines[2], &csv), some(&["2", "c,\"d\""]));
    }
}
