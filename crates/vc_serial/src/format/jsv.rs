//! JSV text: `{Key:Value}` maps and `[a,b]` lists with minimal quoting.
//!
//! The reader keeps every scalar as text; the deserializer converts it to
//! the target type. A missing element (`[1,]`) is `null`, `""` is the
//! empty string, and empty input is `null`. A list holding a single null is
//! written `[null]`, as `[]` is the empty list; a bare `null` list element
//! reads as null and the string `"null"` is always quoted.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use vc_utils::collections::OrderedMap;

use crate::config::Config;
use crate::convert::date::{DateToken, format_date};
use crate::convert::escape::write_jsv_string;
use crate::value::Value;
use crate::{Error, Format, Result};

// -----------------------------------------------------------------------------
// Writer

/// Appends the JSV text of `value` to `out`. `null` is written as nothing.
pub fn write_value(out: &mut String, value: &Value, config: &Config) {
    match value {
        Value::Null => {}
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::String(text) => write_jsv_string(out, text),
        Value::Date(date) => match format_date(*date, config, Format::Jsv) {
            DateToken::Text(text) | DateToken::Escaped(text) => write_jsv_string(out, &text),
            DateToken::Number(n) => {
                let _ = write!(out, "{n}");
            }
        },
        Value::List(items) if matches!(items.as_slice(), [Value::Null]) => out.push_str("[null]"),
        Value::List(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_value(out, item, config);
            }
            out.push(']');
        }
        Value::Map(map) => {
            out.push('{');
            for (index, (key, item)) in map.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_jsv_string(out, key);
                out.push(':');
                write_value(out, item, config);
            }
            out.push('}');
        }
    }
}

pub fn to_string(value: &Value, config: &Config) -> String {
    let mut out = String::new();
    write_value(&mut out, value, config);
    out
}

// -----------------------------------------------------------------------------
// Reader

const NULL_TOKEN: &str = "null";

/// Parses JSV text into an untyped [`Value`].
///
/// ```
/// use vc_serial::{Value, format::jsv::parse};
///
/// assert_eq!(parse("").unwrap(), Value::Null);
/// assert_eq!(parse("[]").unwrap(), Value::List(vec![]));
/// assert_eq!(parse("[1,]").unwrap(), Value::List(vec!["1".into(), Value::Null]));
/// assert_eq!(parse("\"\"").unwrap(), Value::from(""));
/// let map = parse("{One:1st,Two:\"a,b\"}").unwrap();
/// assert_eq!(map.get("Two"), Some(&Value::from("a,b")));
/// ```
pub fn parse(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    if !trimmed.starts_with(['{', '[', '"']) {
        return Ok(Value::String(trimmed.into()));
    }
    let mut reader = JsvReader { text, pos: 0 };
    reader.skip_whitespace();
    let value = reader.read_value()?;
    reader.skip_whitespace();
    if reader.pos < text.len() {
        return Err(reader.error("trailing characters"));
    }
    Ok(value)
}

struct JsvReader<'a> {
    text: &'a str,
    pos: usize,
}

impl JsvReader<'_> {
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    #[cold]
    fn error(&self, message: impl Into<alloc::borrow::Cow<'static, str>>) -> Error {
        Error::parse(Format::Jsv, self.pos, message)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.peek() {
            self.pos += 1;
        }
    }

    /// Reads one element; an absent element is `null`.
    fn read_element(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            Some(b',' | b']' | b'}') | None => Ok(Value::Null),
            _ => self.read_value(),
        }
    }

    fn read_value(&mut self) -> Result<Value> {
        match self.peek() {
            Some(b'{') => {
                self.pos += 1;
                let mut map = OrderedMap::new();
                self.skip_whitespace();
                if self.peek() == Some(b'}') {
                    self.pos += 1;
                    return Ok(Value::Map(map));
                }
                loop {
                    self.skip_whitespace();
                    let key = match self.peek() {
                        Some(b'"') => self.read_quoted()?,
                        _ => self.read_bare(b":")?,
                    };
                    self.skip_whitespace();
                    if self.peek() != Some(b':') {
                        return Err(self.error("expected `:`"));
                    }
                    self.pos += 1;
                    let value = self.read_element()?;
                    map.insert(key, value);
                    self.skip_whitespace();
                    match self.peek() {
                        Some(b',') => self.pos += 1,
                        Some(b'}') => {
                            self.pos += 1;
                            return Ok(Value::Map(map));
                        }
                        _ => return Err(self.error("expected `,` or `}`")),
                    }
                }
            }
            Some(b'[') => {
                self.pos += 1;
                let mut items = Vec::new();
                self.skip_whitespace();
                if self.peek() == Some(b']') {
                    self.pos += 1;
                    return Ok(Value::List(items));
                }
                loop {
                    items.push(self.read_list_element()?);
                    self.skip_whitespace();
                    match self.peek() {
                        Some(b',') => self.pos += 1,
                        Some(b']') => {
                            self.pos += 1;
                            return Ok(Value::List(items));
                        }
                        _ => return Err(self.error("expected `,` or `]`")),
                    }
                }
            }
            Some(b'"') => self.read_quoted().map(Value::String),
            _ => self.read_bare(b",}]").map(Value::String),
        }
    }

    fn read_list_element(&mut self) -> Result<Value> {
        self.skip_whitespace();
        if let Some(rest) = self.text[self.pos..].strip_prefix(NULL_TOKEN)
            && matches!(rest.trim_start().as_bytes().first(), Some(b',' | b']'))
        {
            self.pos += NULL_TOKEN.len();
            return Ok(Value::Null);
        }
        self.read_element()
    }

    fn read_quoted(&mut self) -> Result<String> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            let rest = &self.text[self.pos..];
            let Some(quote) = rest.find('"') else {
                return Err(self.error("unterminated string"));
            };
            out.push_str(&rest[..quote]);
            self.pos += quote + 1;
            if self.peek() == Some(b'"') {
                out.push('"');
                self.pos += 1;
            } else {
                return Ok(out);
            }
        }
    }

    fn read_bare(&mut self, stops: &[u8]) -> Result<String> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if stops.contains(&byte) {
                break;
            }
            self.pos += 1;
        }
        let token = self.text[start..self.pos].trim_end();
        if token.is_empty() && stops == b":" {
            return Err(self.error("expected a key"));
        }
        Ok(token.into())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use vc_utils::collections::OrderedMap;

    use super::{parse, to_string};
    use crate::config::Config;
    use crate::value::Value;

    #[test]
    fn dictionary_scenario() {
        let mut map = OrderedMap::new();
        map.insert("One".into(), Value::from("1st"));
        map.insert("Two".into(), Value::from("2nd"));
        map.insert("Three".into(), Value::from("3rd"));
        let value = Value::Map(map);

        let text = to_string(&value, &Config::default());
        assert_eq!(text, "{One:1st,Two:2nd,Three:3rd}");
        assert_eq!(parse(&text).unwrap(), value);
    }

    #[test]
    fn null_empty_and_missing() {
        assert_eq!(parse("   ").unwrap(), Value::Null);
        assert_eq!(parse("{}").unwrap(), Value::Map(OrderedMap::new()));
        assert_eq!(parse("[,]").unwrap(), Value::List(vec![Value::Null, Value::Null]));
        assert_eq!(parse("{a:,b:\"\"}").unwrap().get("a"), Some(&Value::Null));
        assert_eq!(parse("{a:,b:\"\"}").unwrap().get("b"), Some(&Value::from("")));

        let list = Value::List(vec![Value::from(1), Value::Null]);
        assert_eq!(to_string(&list, &Config::default()), "[1,]");
    }

    #[test]
    fn single_null_keeps_its_slot() {
        let config = Config::default();
        let single = Value::List(vec![Value::Null]);
        assert_eq!(to_string(&single, &config), "[null]");
        assert_eq!(parse("[null]").unwrap(), single);
        assert_eq!(parse("[ null , 1]").unwrap(), Value::List(vec![Value::Null, "1".into()]));
        assert_eq!(parse("[nullable]").unwrap(), Value::List(vec!["nullable".into()]));

        let nested = Value::List(vec![single.clone(), Value::List(vec!["1".into()])]);
        assert_eq!(to_string(&nested, &config), "[[null],[1]]");
        assert_eq!(parse("[[null],[1]]").unwrap(), nested);

        let text = Value::List(vec![Value::from("null")]);
        assert_eq!(to_string(&text, &config), r#"["null"]"#);
        assert_eq!(parse(r#"["null"]"#).unwrap(), text);
    }

    #[test]
    fn quoting_round_trips() {
        let value = Value::List(vec![
            Value::from("a,b"),
            Value::from("say \"hi\""),
            Value::from("{not a map}"),
            Value::from(" padded "),
            Value::from(""),
        ]);
        let text = to_string(&value, &Config::default());
        assert_eq!(text, r#"["a,b","say ""hi""","{not a map}"," padded ",""]"#);
        assert_eq!(parse(&text).unwrap(), value);
    }

    #[test]
    fn nesting_and_whitespace() {
        let value = parse("{ Id : 1 , Tags : [ x , y ] , Child : { Name : n } }").unwrap();
        assert_eq!(value.get("Id"), Some(&Value::from("1")));
        assert_eq!(value.get("Tags"), Some(&Value::List(vec!["x".into(), "y".into()])));
        assert_eq!(value.get("Child").and_then(|c| c.get("Name")), Some(&Value::from("n")));
        assert!(parse("{a:1").is_err());
        assert!(parse("[1,2").is_err());
    }

    #[test]
    fn bare_top_level_text() {
        assert_eq!(parse("hello, world").unwrap(), Value::from("hello, world"));
        assert_eq!(parse(" 42 ").unwrap(), Value::from("42"));
    }
}
