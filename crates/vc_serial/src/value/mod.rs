//! The untyped value tree shared by every format.
//!
//! Serialization lowers a reflected graph into a [`Value`] and hands it to a
//! format writer; parsing produces a `Value` that the deserializer lifts
//! into a typed graph. A `Value` is also what an [`Object`] slot holds when
//! the input carried no type hint.
//!
//! [`Object`]: vc_reflect::ops::Object

// -----------------------------------------------------------------------------
// Modules

mod json_object;
mod number;

// -----------------------------------------------------------------------------
// Exports

pub use json_object::JsonObject;
pub use number::Number;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use vc_reflect::Reflect;
use vc_reflect::impls::NonGenericTypeInfoCell;
use vc_reflect::info::{OpaqueInfo, ReflectKind, TypeInfo, TypePath, Typed};
use vc_reflect::ops::{ReflectMut, ReflectRef};
use vc_reflect::registry::{GetTypeMeta, TypeMeta};
use vc_utils::collections::OrderedMap;

use crate::config::Config;
use crate::convert::date;

// -----------------------------------------------------------------------------
// DateValue

/// A date read from text, keeping the zone information it was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    Utc(DateTime<Utc>),
    Offset(DateTime<FixedOffset>),
    /// A date and time without zone.
    Naive(NaiveDateTime),
    Date(NaiveDate),
}

impl DateValue {
    /// The instant in UTC; unzoned values are read as UTC wall time.
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            Self::Utc(v) => v,
            Self::Offset(v) => v.with_timezone(&Utc),
            Self::Naive(v) => v.and_utc(),
            Self::Date(v) => v.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }

    /// Local wall time, dropping any zone.
    pub fn to_naive(self) -> NaiveDateTime {
        match self {
            Self::Utc(v) => v.naive_utc(),
            Self::Offset(v) => v.naive_local(),
            Self::Naive(v) => v,
            Self::Date(v) => v.and_time(chrono::NaiveTime::MIN),
        }
    }

    pub fn to_fixed_offset(self) -> DateTime<FixedOffset> {
        match self {
            Self::Offset(v) => v,
            other => other.to_utc().fixed_offset(),
        }
    }
}

// -----------------------------------------------------------------------------
// Value

/// An untyped value.
///
/// ```
/// use vc_serial::{Value, parse_json};
///
/// let value = parse_json(r#"{"a":[1,null],"b":"x"}"#).unwrap();
/// assert_eq!(value.get("b").and_then(Value::as_str), Some("x"));
/// assert_eq!(value.get("a").and_then(Value::as_list).map(<[Value]>::len), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateValue),
    List(Vec<Value>),
    Map(OrderedMap<String, Value>),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&OrderedMap<String, Value>> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// The member `key` of a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }

    /// A short name of the variant, for messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Applies the untyped inference settings of `config`.
    ///
    /// - `try_parse_into_best_fit`: numbers move to their narrowest type.
    /// - `parse_primitive_dates`: date-like strings become dates.
    /// - `try_parse_primitive_values`: numeric and boolean strings become
    ///   numbers and bools.
    pub fn normalize(self, config: &Config) -> Value {
        match self {
            Self::Number(n) if config.try_parse_into_best_fit => Self::Number(n.best_fit()),
            Self::String(text) => {
                if config.parse_primitive_dates
                    && let Some(date) = date::parse_date(&text)
                {
                    return Self::Date(date);
                }
                if config.try_parse_primitive_values {
                    if text.eq_ignore_ascii_case("true") {
                        return Self::Bool(true);
                    }
                    if text.eq_ignore_ascii_case("false") {
                        return Self::Bool(false);
                    }
                    let number = if config.try_parse_into_best_fit {
                        Number::parse_best_fit(&text)
                    } else {
                        Number::parse(&text)
                    };
                    if let Some(number) = number {
                        return Self::Number(number);
                    }
                }
                Self::String(text)
            }
            Self::List(items) => Self::List(items.into_iter().map(|v| v.normalize(config)).collect()),
            Self::Map(map) => Self::Map(map.into_iter().map(|(k, v)| (k, v.normalize(config))).collect()),
            other => other,
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Number> for Value {
    #[inline]
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Number(Number::I32(value))
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Number(Number::I64(value))
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Number(Number::F64(value))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<OrderedMap<String, Value>> for Value {
    #[inline]
    fn from(value: OrderedMap<String, Value>) -> Self {
        Self::Map(value)
    }
}

// -----------------------------------------------------------------------------
// Reflection

impl TypePath for Value {
    #[inline]
    fn type_path() -> &'static str {
        "vc_serial::value::Value"
    }

    #[inline]
    fn type_name() -> &'static str {
        "Value"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Value"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("vc_serial::value")
    }
}

impl Typed for Value {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::Opaque(OpaqueInfo::new::<Self>().with_default(|| Box::new(Value::Null)))
        })
    }
}

impl Reflect for Value {
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Opaque
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Opaque(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Opaque(self)
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        let other = match other.reflect_ref() {
            ReflectRef::Object(object) => object.value(),
            _ => other,
        };
        other.downcast_ref::<Self>().map(|other| self == other)
    }

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl GetTypeMeta for Value {
    #[inline]
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use vc_reflect::Reflect;
    use vc_reflect::ops::Object;

    use super::{Number, Value};
    use crate::config::Config;

    #[test]
    fn normalize_follows_settings() {
        let raw = Value::List(vec!["12".into(), "true".into(), "x".into(), Value::from(300_i32)]);

        assert_eq!(raw.clone().normalize(&Config::default()), raw);

        let config = Config::parse("ttpptv,ipf").unwrap();
        let expected = Value::List(vec![
            Value::Number(Number::U8(12)),
            Value::Bool(true),
            "x".into(),
            Value::Number(Number::I16(300)),
        ]);
        assert_eq!(raw.normalize(&config), expected);
    }

    #[test]
    fn normalize_dates_on_request() {
        let config = Config::parse("ppd").unwrap();
        let value = Value::from("2024-02-29").normalize(&config);
        assert!(matches!(value, Value::Date(_)));
        assert_eq!(Value::from("hello").normalize(&config), Value::from("hello"));
    }

    #[test]
    fn reflects_as_opaque() {
        let value = Value::from("a");
        let slot = Object::new(value.clone());
        assert_eq!(value.reflect_partial_eq(&slot), Some(true));
        assert_eq!(value.reflect_partial_eq(&1_i32), None);

        let mut target = Value::Null;
        assert!(target.set(Box::new(Value::Bool(true))).is_ok());
        assert_eq!(target, Value::Bool(true));
    }
}
