//! JSON text: a writer over [`Value`] and a position-tracking reader.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Write;

use vc_utils::collections::OrderedMap;

use crate::config::Config;
use crate::convert::date::{DateToken, format_date};
use crate::convert::escape::write_json_string;
use crate::value::{Number, Value};
use crate::{Error, Format, Result};

// -----------------------------------------------------------------------------
// Writer

/// Appends the compact JSON text of `value` to `out`.
///
/// Non-finite floats are written as `null`.
pub fn write_value(out: &mut String, value: &Value, config: &Config) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => write_number(out, *n),
        Value::String(text) => write_string(out, text, config),
        Value::Date(date) => match format_date(*date, config, Format::Json) {
            DateToken::Text(text) => write_string(out, &text, config),
            DateToken::Escaped(text) => {
                out.push('"');
                out.push_str(&text);
                out.push('"');
            }
            DateToken::Number(n) => {
                let _ = write!(out, "{n}");
            }
        },
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
                write_string(out, key, config);
                out.push(':');
                write_value(out, item, config);
            }
            out.push('}');
        }
    }
}

/// The compact JSON text of `value`.
pub fn to_string(value: &Value, config: &Config) -> String {
    let mut out = String::new();
    write_value(&mut out, value, config);
    out
}

#[inline]
fn write_string(out: &mut String, text: &str, config: &Config) {
    write_json_string(out, text, config.escape_html_chars, config.escape_unicode);
}

fn write_number(out: &mut String, number: Number) {
    let finite = match number {
        Number::F32(v) => v.is_finite(),
        Number::F64(v) => v.is_finite(),
        _ => true,
    };
    if finite {
        let _ = write!(out, "{number}");
    } else {
        out.push_str("null");
    }
}

// -----------------------------------------------------------------------------
// Reader

/// Parses JSON text into an untyped [`Value`].
///
/// Empty or whitespace-only input is `null`. Numbers keep the default
/// width ladder; see [`Value::normalize`] for the inference settings.
///
/// ```
/// use vc_serial::{Value, format::json::parse};
///
/// assert_eq!(parse("").unwrap(), Value::Null);
/// assert_eq!(parse(" [ 1 , \"\\u0041\" ] ").unwrap(), Value::List(vec![1.into(), "A".into()]));
/// assert!(parse("{\"a\":}").unwrap_err().is_parse());
/// ```
pub fn parse(text: &str) -> Result<Value> {
    let mut reader = JsonReader::new(text);
    reader.skip_whitespace();
    if reader.at_end() {
        return Ok(Value::Null);
    }
    let value = reader.read_value()?;
    reader.expect_end()?;
    Ok(value)
}

/// A cursor over JSON text.
pub(crate) struct JsonReader<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> JsonReader<'a> {
    pub(crate) const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    #[inline]
    pub(crate) const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    #[cold]
    pub(crate) fn error(&self, message: impl Into<alloc::borrow::Cow<'static, str>>) -> Error {
        Error::parse(Format::Json, self.pos, message)
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.peek() {
            self.pos += 1;
        }
    }

    pub(crate) fn expect(&mut self, byte: u8) -> Result<()> {
        self.skip_whitespace();
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(byte as char))
        }
    }

    /// Consumes `byte` if it is next.
    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_end(&mut self) -> Result<()> {
        self.skip_whitespace();
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error("trailing characters"))
        }
    }

    #[cold]
    fn unexpected(&self, expected: char) -> Error {
        match self.text[self.pos..].chars().next() {
            Some(found) => self.error(alloc::format!("expected `{expected}`, found `{found}`")),
            None => self.error(alloc::format!("expected `{expected}`, found end of input")),
        }
    }

    pub(crate) fn read_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'{') => {
                self.pos += 1;
                let mut map = OrderedMap::new();
                if self.eat(b'}') {
                    return Ok(Value::Map(map));
                }
                loop {
                    self.skip_whitespace();
                    let key = self.read_string()?;
                    self.expect(b':')?;
                    let value = self.read_value()?;
                    map.insert(key, value);
                    if self.eat(b',') {
                        continue;
                    }
                    self.expect(b'}')?;
                    return Ok(Value::Map(map));
                }
            }
            Some(b'[') => {
                self.pos += 1;
                let mut items = Vec::new();
                if self.eat(b']') {
                    return Ok(Value::List(items));
                }
                loop {
                    items.push(self.read_value()?);
                    if self.eat(b',') {
                        continue;
                    }
                    self.expect(b']')?;
                    return Ok(Value::List(items));
                }
            }
            Some(b'"') => self.read_string().map(Value::String),
            Some(b't') => self.read_literal("true", Value::Bool(true)),
            Some(b'f') => self.read_literal("false", Value::Bool(false)),
            Some(b'n') => self.read_literal("null", Value::Null),
            Some(b'-' | b'+' | b'.' | b'0'..=b'9') => self.read_number(),
            Some(_) => Err(self.error("expected a value")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Skips one value and returns its source text.
    pub(crate) fn skip_value(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let start = self.pos;
        match self.peek() {
            Some(open @ (b'{' | b'[')) => {
                let close = if open == b'{' { b'}' } else { b']' };
                let mut depth = 0_usize;
                while let Some(byte) = self.peek() {
                    match byte {
                        b'"' => {
                            self.skip_string()?;
                            continue;
                        }
                        b'{' | b'[' => depth += 1,
                        b'}' | b']' => {
                            depth = depth.saturating_sub(1);
                            if depth == 0 {
                                self.pos += 1;
                                if byte != close {
                                    return Err(self.error("mismatched bracket"));
                                }
                                return Ok(&self.text[start..self.pos]);
                            }
                        }
                        _ => {}
                    }
                    self.pos += 1;
                }
                Err(self.error("unterminated container"))
            }
            Some(b'"') => {
                self.skip_string()?;
                Ok(&self.text[start..self.pos])
            }
            Some(_) => {
                while let Some(byte) = self.peek() {
                    if matches!(byte, b',' | b'}' | b']' | b' ' | b'\t' | b'\r' | b'\n') {
                        break;
                    }
                    self.pos += 1;
                }
                if self.pos == start {
                    return Err(self.error("expected a value"));
                }
                Ok(&self.text[start..self.pos])
            }
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn skip_string(&mut self) -> Result<()> {
        self.pos += 1;
        while let Some(byte) = self.peek() {
            self.pos += 1;
            match byte {
                b'\\' => self.pos += 1,
                b'"' => return Ok(()),
                _ => {}
            }
        }
        Err(self.error("unterminated string"))
    }

    fn read_literal(&mut self, literal: &str, value: Value) -> Result<Value> {
        if self.text[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            Ok(value)
        } else {
            Err(self.error("invalid literal"))
        }
    }

    fn read_number(&mut self) -> Result<Value> {
        let start = self.pos;
        while let Some(b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
        let text = &self.text[start..self.pos];
        match Number::parse(text) {
            Some(number) => Ok(Value::Number(number)),
            None => Err(Error::parse(Format::Json, start, alloc::format!("invalid number `{text}`"))),
        }
    }

    pub(crate) fn read_string(&mut self) -> Result<String> {
        if self.peek() != Some(b'"') {
            return Err(self.unexpected('"'));
        }
        self.pos += 1;
        let mut out = String::new();
        loop {
            let rest = &self.text[self.pos..];
            let Some(stop) = rest.find(['"', '\\']) else {
                return Err(self.error("unterminated string"));
            };
            out.push_str(&rest[..stop]);
            self.pos += stop;
            if self.peek() == Some(b'"') {
                self.pos += 1;
                return Ok(out);
            }
            self.pos += 1;
            let escape = self.peek().ok_or_else(|| self.error("unterminated escape"))?;
            self.pos += 1;
            match escape {
                b'"' => out.push('"'),
                b'\\' => out.push('\\'),
                b'/' => out.push('/'),
                b'b' => out.push('\u{8}'),
                b'f' => out.push('\u{c}'),
                b'n' => out.push('\n'),
                b'r' => out.push('\r'),
                b't' => out.push('\t'),
                b'u' => {
                    let unit = self.read_hex4()?;
                    let c = if (0xD800..0xDC00).contains(&unit) {
                        if !self.text[self.pos..].starts_with("\\u") {
                            return Err(self.error("unpaired surrogate"));
                        }
                        self.pos += 2;
                        let low = self.read_hex4()?;
                        if !(0xDC00..0xE000).contains(&low) {
                            return Err(self.error("invalid low surrogate"));
                        }
                        char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))
                    } else {
                        char::from_u32(unit)
                    };
                    out.push(c.ok_or_else(|| self.error("invalid unicode escape"))?);
                }
                other => {
                    return Err(self.error(alloc::format!("invalid escape `\\{}`", other as char)));
                }
            }
        }
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let digits = self
            .text
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error("truncated unicode escape"))?;
        let unit = u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid unicode escape"))?;
        self.pos += 4;
        Ok(unit)
    }
}

/// Unescapes a raw JSON fragment that holds a string; other fragments are
/// returned as written, and `null` is `None`.
pub(crate) fn fragment_text(raw: &str) -> Result<Option<String>> {
    let raw = raw.trim();
    if raw == "null" {
        return Ok(None);
    }
    if raw.starts_with('"') {
        let mut reader = JsonReader::new(raw);
        return reader.read_string().map(Some);
    }
    Ok(Some(raw.to_string()))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{parse, to_string};
    use crate::config::Config;
    use crate::value::{DateValue, Number, Value};

    #[test]
    fn writes_valid_json() {
        let config = Config::default();
        let value = parse(r#"{"a":[1,2.5,-3],"b":"line\nbreak \"q\"","c":null,"d":true,"e":{}}"#).unwrap();
        let text = to_string(&value, &config);
        let checked: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(checked["b"], "line\nbreak \"q\"");
        assert_eq!(checked["a"][1], 2.5);
        assert_eq!(parse(&text).unwrap(), value);
    }

    #[test]
    fn dates_use_the_wcf_form() {
        let config = Config::default();
        let date = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let text = to_string(&Value::Date(DateValue::Utc(date)), &config);
        assert_eq!(text, r#""\/Date(1577934245000)\/""#);
        assert_eq!(parse(&text).unwrap(), Value::from("/Date(1577934245000)/"));
    }

    #[test]
    fn numbers_and_whitespace() {
        assert_eq!(parse(" \r\n 007 ").unwrap(), Value::Number(Number::I32(7)));
        assert_eq!(parse("+5").unwrap(), Value::Number(Number::I32(5)));
        assert_eq!(parse("1e3").unwrap(), Value::Number(Number::F64(1000.0)));
        assert_eq!(parse("[ 1 ,\n 2 ]").unwrap(), Value::List(vec![1.into(), 2.into()]));
        assert_eq!(to_string(&Value::Number(Number::F64(f64::NAN)), &Config::default()), "null");
    }

    #[test]
    fn strings_and_surrogates() {
        assert_eq!(parse(r#""\ud83d\ude00 \/ \t""#).unwrap(), Value::from("😀 / \t"));
        assert!(parse(r#""\ud83d""#).is_err());
        assert!(parse(r#""open"#).is_err());
    }

    #[test]
    fn errors_carry_positions() {
        let err = parse(r#"{"a":1,}"#).unwrap_err();
        assert_eq!(err.to_string(), "JSON parse error at 7: expected `\"`, found `}`");
        assert!(parse("[1 2]").is_err());
        assert!(parse("{} x").is_err());
    }
}
