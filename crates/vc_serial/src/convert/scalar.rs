//! Leaf value conversion in both directions.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use vc_reflect::info::ScalarKind;
use vc_reflect::ops::{ScalarRef, ScalarValue};

use super::date;
use crate::config::Config;
use crate::value::{DateValue, Number, Value};

/// Lowers a scalar to its untyped form.
///
/// Durations, GUIDs, bytes and chars become text; dates stay dates so
/// each writer can pick its own form.
pub fn scalar_to_value(scalar: ScalarRef<'_>, config: &Config) -> Value {
    match scalar {
        ScalarRef::Bool(v) => Value::Bool(v),
        ScalarRef::Char(v) => Value::String(v.to_string()),
        ScalarRef::String(v) => Value::String(v.into()),
        ScalarRef::DateTime(v) => Value::Date(DateValue::Utc(v)),
        ScalarRef::DateTimeOffset(v) => Value::Date(DateValue::Offset(v)),
        ScalarRef::NaiveDateTime(v) => Value::Date(DateValue::Naive(v)),
        ScalarRef::NaiveDate(v) => Value::Date(DateValue::Date(v)),
        ScalarRef::TimeSpan(v) => Value::String(date::format_time_span(v, config.time_span_handler)),
        ScalarRef::Guid(v) => Value::String(format!("{}", v.simple())),
        ScalarRef::Bytes(v) => Value::String(BASE64.encode(v)),
        numeric => match Number::from_scalar(numeric) {
            Some(number) => Value::Number(number),
            None => Value::Null,
        },
    }
}

/// Converts an untyped value to a scalar of `kind`.
///
/// Text is parsed; numbers are range checked. The error is a message for
/// [`Error::coercion`](crate::Error::coercion).
///
/// ```
/// use vc_reflect::info::ScalarKind;
/// use vc_reflect::ops::ScalarValue;
/// use vc_serial::{Value, config::Config, convert::scalar::coerce_scalar};
///
/// let config = Config::default();
/// assert_eq!(coerce_scalar(&Value::from("+0042"), ScalarKind::U8, &config), Ok(ScalarValue::U8(42)));
/// assert!(coerce_scalar(&Value::from(300), ScalarKind::U8, &config).is_err());
/// ```
pub fn coerce_scalar(value: &Value, kind: ScalarKind, config: &Config) -> Result<ScalarValue, String> {
    let mismatch = || format!("expected {kind:?}, found {}", value.kind_name());

    match kind {
        ScalarKind::Bool => match value {
            Value::Bool(v) => Ok(ScalarValue::Bool(*v)),
            Value::Number(n) => Ok(ScalarValue::Bool(n.to_f64() != 0.0)),
            Value::String(s) => match s.trim() {
                t if t.eq_ignore_ascii_case("true") || t == "1" => Ok(ScalarValue::Bool(true)),
                t if t.eq_ignore_ascii_case("false") || t == "0" || t.is_empty() => Ok(ScalarValue::Bool(false)),
                other => Err(format!("`{other}` is not a bool")),
            },
            _ => Err(mismatch()),
        },
        ScalarKind::Char => match value {
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(ScalarValue::Char(c)),
                    (None, _) => Ok(ScalarValue::Char('\0')),
                    _ => Err(format!("`{s}` is not a single character")),
                }
            }
            Value::Number(n) => n
                .to_u128()
                .and_then(|code| u32::try_from(code).ok())
                .and_then(char::from_u32)
                .map(ScalarValue::Char)
                .ok_or_else(|| format!("{n} is not a character code")),
            _ => Err(mismatch()),
        },
        ScalarKind::String => match value {
            Value::String(s) => Ok(ScalarValue::String(s.clone())),
            Value::Number(n) => Ok(ScalarValue::String(n.to_string())),
            Value::Bool(b) => Ok(ScalarValue::String(b.to_string())),
            Value::Date(d) => match date::format_date(*d, config, crate::Format::Jsv) {
                date::DateToken::Text(text) | date::DateToken::Escaped(text) => Ok(ScalarValue::String(text)),
                date::DateToken::Number(n) => Ok(ScalarValue::String(n.to_string())),
            },
            _ => Err(mismatch()),
        },
        kind if kind.is_integer() || kind.is_float() => {
            let number = match value {
                Value::Number(n) => *n,
                Value::Bool(b) => Number::U8(u8::from(*b)),
                Value::String(s) => Number::parse(s).ok_or_else(|| format!("`{}` is not a number", s.trim()))?,
                _ => return Err(mismatch()),
            };
            number_to_scalar(number, kind).ok_or_else(|| format!("{number} is out of range for {kind:?}"))
        }
        ScalarKind::DateTime
        | ScalarKind::DateTimeOffset
        | ScalarKind::NaiveDateTime
        | ScalarKind::NaiveDate => {
            let date = match value {
                Value::Date(d) => *d,
                Value::String(s) => date::parse_date(s).ok_or_else(|| format!("`{s}` is not a date"))?,
                Value::Number(n) => n
                    .to_i128()
                    .and_then(|v| i64::try_from(v).ok())
                    .and_then(|v| date::from_unix(v, config))
                    .ok_or_else(|| format!("{n} is not a timestamp"))?,
                _ => return Err(mismatch()),
            };
            Ok(date_to_scalar(date, kind, config))
        }
        ScalarKind::TimeSpan => match value {
            Value::String(s) => date::parse_time_span(s)
                .map(ScalarValue::TimeSpan)
                .ok_or_else(|| format!("`{s}` is not a duration")),
            Value::Number(n) => n
                .to_i128()
                .and_then(|v| i64::try_from(v).ok())
                .map(|ticks| ScalarValue::TimeSpan(date::from_ticks(ticks)))
                .ok_or_else(|| format!("{n} is not a tick count")),
            _ => Err(mismatch()),
        },
        ScalarKind::Guid => match value {
            Value::String(s) => uuid::Uuid::try_parse(s.trim())
                .map(ScalarValue::Guid)
                .map_err(|_| format!("`{s}` is not a GUID")),
            _ => Err(mismatch()),
        },
        ScalarKind::Bytes => match value {
            Value::String(s) => BASE64
                .decode(s.trim())
                .map(ScalarValue::Bytes)
                .map_err(|err| format!("invalid base64: {err}")),
            Value::List(items) => items
                .iter()
                .map(|item| match item {
                    Value::Number(n) => n.to_u128().and_then(|v| u8::try_from(v).ok()),
                    _ => None,
                })
                .collect::<Option<Vec<u8>>>()
                .map(ScalarValue::Bytes)
                .ok_or_else(|| String::from("expected a list of bytes")),
            _ => Err(mismatch()),
        },
        _ => Err(mismatch()),
    }
}

/// Converts `number` to the scalar `kind` when it fits exactly.
pub fn number_to_scalar(number: Number, kind: ScalarKind) -> Option<ScalarValue> {
    macro_rules! int {
        ($variant:ident, $ty:ty) => {
            match number.to_i128() {
                Some(v) => <$ty>::try_from(v).ok().map(ScalarValue::$variant),
                None => number.to_u128().and_then(|v| <$ty>::try_from(v).ok()).map(ScalarValue::$variant),
            }
        };
    }

    match kind {
        ScalarKind::I8 => int!(I8, i8),
        ScalarKind::I16 => int!(I16, i16),
        ScalarKind::I32 => int!(I32, i32),
        ScalarKind::I64 => int!(I64, i64),
        ScalarKind::I128 => int!(I128, i128),
        ScalarKind::Isize => int!(Isize, isize),
        ScalarKind::U8 => int!(U8, u8),
        ScalarKind::U16 => int!(U16, u16),
        ScalarKind::U32 => int!(U32, u32),
        ScalarKind::U64 => int!(U64, u64),
        ScalarKind::U128 => int!(U128, u128),
        ScalarKind::Usize => int!(Usize, usize),
        ScalarKind::F32 => Some(ScalarValue::F32(number.to_f64() as f32)),
        ScalarKind::F64 => Some(ScalarValue::F64(number.to_f64())),
        _ => None,
    }
}

fn date_to_scalar(date: DateValue, kind: ScalarKind, config: &Config) -> ScalarValue {
    match kind {
        ScalarKind::DateTime => ScalarValue::DateTime(date.to_utc()),
        ScalarKind::DateTimeOffset => ScalarValue::DateTimeOffset(date.to_fixed_offset()),
        ScalarKind::NaiveDate => ScalarValue::NaiveDate(date.to_naive().date()),
        _ => match date {
            DateValue::Offset(v) if config.assume_utc => ScalarValue::NaiveDateTime(v.naive_utc()),
            other => ScalarValue::NaiveDateTime(other.to_naive()),
        },
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeDelta};
    use vc_reflect::info::ScalarKind;
    use vc_reflect::ops::{ScalarRef, ScalarValue};

    use super::{coerce_scalar, scalar_to_value};
    use crate::config::Config;
    use crate::value::{Number, Value};

    #[test]
    fn numbers_are_range_checked() {
        let config = Config::default();
        assert_eq!(coerce_scalar(&Value::from(-1), ScalarKind::I8, &config), Ok(ScalarValue::I8(-1)));
        assert!(coerce_scalar(&Value::from(-1), ScalarKind::U32, &config).is_err());
        assert!(coerce_scalar(&Value::from(1.5), ScalarKind::I32, &config).is_err());
        assert_eq!(
            coerce_scalar(&Value::Number(Number::U128(u128::MAX)), ScalarKind::U128, &config),
            Ok(ScalarValue::U128(u128::MAX))
        );
        assert_eq!(coerce_scalar(&Value::from("2.5"), ScalarKind::F32, &config), Ok(ScalarValue::F32(2.5)));
        assert!(coerce_scalar(&Value::from("abc"), ScalarKind::I32, &config).is_err());
    }

    #[test]
    fn text_forms_round_trip() {
        let config = Config::default();
        let guid = uuid::Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
        let cases = [
            ScalarValue::Guid(guid),
            ScalarValue::Bytes(vec![0, 1, 2, 255]),
            ScalarValue::TimeSpan(TimeDelta::milliseconds(1500)),
            ScalarValue::Char('x'),
            ScalarValue::NaiveDate(NaiveDate::from_ymd_opt(2020, 1, 31).unwrap()),
        ];
        for scalar in cases {
            let value = scalar_to_value(scalar.as_ref(), &config);
            assert_eq!(coerce_scalar(&value, scalar.kind(), &config).as_ref(), Ok(&scalar));
        }
        assert_eq!(
            scalar_to_value(ScalarRef::Guid(guid), &config),
            Value::from("0123456789abcdef0123456789abcdef")
        );
    }

    #[test]
    fn guids_accept_every_form() {
        let config = Config::default();
        for text in [
            "0123456789abcdef0123456789abcdef",
            "01234567-89ab-cdef-0123-456789abcdef",
            "{01234567-89AB-CDEF-0123-456789ABCDEF}",
        ] {
            assert!(coerce_scalar(&Value::from(text), ScalarKind::Guid, &config).is_ok(), "{text}");
        }
    }

    #[test]
    fn bools_and_ticks() {
        let config = Config::default();
        assert_eq!(coerce_scalar(&Value::from("True"), ScalarKind::Bool, &config), Ok(ScalarValue::Bool(true)));
        assert_eq!(
            coerce_scalar(&Value::from(10_000_000_i64), ScalarKind::TimeSpan, &config),
            Ok(ScalarValue::TimeSpan(TimeDelta::seconds(1)))
        );
    }
}
