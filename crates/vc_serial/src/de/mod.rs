//! Construction of reflected values from the untyped [`Value`] tree.
//!
//! The [`Deserializer`] builds a value of a declared [`TypeInfo`] from
//! whatever a format reader produced: JSON numbers or JSV text are both
//! accepted for numeric members, and text holding a JSV list or map is
//! expanded when the declared type is a container. Polymorphic
//! [`Object`] slots go through the [`resolver`] before anything named by
//! a payload is constructed.
//!
//! A member that cannot be converted is logged and skipped, leaving its
//! default, unless [`Config::throw_on_error`] is set. Refused type hints
//! always fail.

use alloc::boxed::Box;
use alloc::format;

use log::warn;
use vc_reflect::Reflect;
use vc_reflect::info::{
    EnumInfo, ListInfo, MapInfo, OptionInfo, ScalarInfo, ScalarKind, StructInfo, TypeInfo, Typed,
};
use vc_reflect::ops::{Object, ReflectMut};

use crate::config::{Config, TypeConfigTable, type_config_table};
use crate::convert::enums::coerce_enum;
use crate::convert::scalar::coerce_scalar;
use crate::format::{json, jsv};
use crate::ser::find_member;
use crate::value::Value;
use crate::{Error, Result, resolver};

// -----------------------------------------------------------------------------
// Deserializer

/// Builds reflected values under one effective config.
pub struct Deserializer<'a> {
    config: &'a Config,
    types: TypeConfigTable,
}

impl<'a> Deserializer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            types: type_config_table(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        self.config
    }

    /// Builds a value of type `info` from `value`.
    pub fn from_value(&self, value: &Value, info: &'static TypeInfo) -> Result<Box<dyn Reflect>> {
        self.build(value, info, 0)
    }

    fn build(&self, value: &Value, info: &'static TypeInfo, depth: usize) -> Result<Box<dyn Reflect>> {
        let type_config = self.types.get(info.type_id());
        if let Some(custom) = type_config.and_then(|tc| tc.deserialize_fn.as_ref())
            && !value.is_null()
        {
            let text = match value {
                Value::String(text) => text.clone(),
                other => json::to_string(other, self.config),
            };
            return custom(&text).map_err(|message| Error::custom_function(info.type_path(), message));
        }

        let built = match info {
            TypeInfo::Scalar(scalar) => self.build_scalar(value, scalar)?,
            TypeInfo::Enum(e) => self.build_enum(value, e)?,
            TypeInfo::Option(option) => self.build_option(value, option, depth)?,
            TypeInfo::List(list) => self.build_list(value, list, depth)?,
            TypeInfo::Map(map) => self.build_map(value, map, depth)?,
            TypeInfo::Struct(s) => self.build_struct(value, s, info, depth)?,
            TypeInfo::Object(_) => self.build_object(value, depth)?,
            TypeInfo::Opaque(_) if info.is::<Value>() => Box::new(value.clone().normalize(self.config)),
            TypeInfo::Opaque(_) => match info.construct() {
                Some(default) if value.is_null() => default,
                _ => return Err(Error::coercion(info.type_path(), "opaque values need a deserialize function")),
            },
        };

        Ok(match type_config.and_then(|tc| tc.on_deserialized.as_ref()) {
            Some(hook) => hook(built),
            None => built,
        })
    }

    fn build_scalar(&self, value: &Value, info: &ScalarInfo) -> Result<Box<dyn Reflect>> {
        let kind = info.scalar_kind();
        let blank = matches!(value, Value::String(text) if text.trim().is_empty()) && kind != ScalarKind::String;
        if value.is_null() || blank {
            return Ok(info.construct());
        }
        let scalar = coerce_scalar(value, kind, self.config)
            .map_err(|message| Error::coercion(info.ty().path(), message))?;
        info.from_scalar(scalar)
            .map_err(|_| Error::coercion(info.ty().path(), "scalar kind mismatch"))
    }

    fn build_enum(&self, value: &Value, info: &EnumInfo) -> Result<Box<dyn Reflect>> {
        match value {
            Value::Null => Ok(info.construct()),
            Value::String(text) if text.trim().is_empty() => Ok(info.construct()),
            value => coerce_enum(value, info).map_err(|message| Error::coercion(info.ty().path(), message)),
        }
    }

    fn build_option(&self, value: &Value, info: &OptionInfo, depth: usize) -> Result<Box<dyn Reflect>> {
        let mut option = info.construct();
        if value.is_null() {
            return Ok(option);
        }
        let inner = self.build(value, info.item_info(), depth)?;
        match option.reflect_mut() {
            ReflectMut::Option(nullable) => nullable
                .set_some(inner)
                .map_err(|_| Error::coercion(info.ty().path(), "item type mismatch"))?,
            _ => return Err(Error::coercion(info.ty().path(), "not an option")),
        }
        Ok(option)
    }

    fn build_list(&self, value: &Value, info: &ListInfo, depth: usize) -> Result<Box<dyn Reflect>> {
        let mut list = info.construct();
        if depth >= self.config.max_depth {
            return Ok(list);
        }
        let expanded;
        let items: &[Value] = match value {
            Value::Null => &[],
            Value::List(items) => items,
            Value::String(text) => {
                expanded = expand_list(text)?;
                &expanded
            }
            other => core::slice::from_ref(other),
        };
        let ReflectMut::List(target) = list.reflect_mut() else {
            return Err(Error::coercion(info.ty().path(), "not a list"));
        };
        for item in items {
            let item = self.build(item, info.item_info(), depth + 1)?;
            target
                .push(item)
                .map_err(|_| Error::coercion(info.ty().path(), "item type mismatch"))?;
        }
        Ok(list)
    }

    fn build_map(&self, value: &Value, info: &MapInfo, depth: usize) -> Result<Box<dyn Reflect>> {
        let mut map = info.construct();
        if depth >= self.config.max_depth {
            return Ok(map);
        }
        let parsed;
        let entries = match value {
            Value::Null => return Ok(map),
            Value::Map(entries) => entries,
            Value::String(text) => {
                parsed = jsv::parse(text)?;
                match &parsed {
                    Value::Map(entries) => entries,
                    Value::Null => return Ok(map),
                    other => return Err(mismatch(info.ty().path(), "map", other)),
                }
            }
            other => return Err(mismatch(info.ty().path(), "map", other)),
        };
        let ReflectMut::Map(target) = map.reflect_mut() else {
            return Err(Error::coercion(info.ty().path(), "not a map"));
        };
        for (key, item) in entries.iter() {
            let key_value = Value::String(key.clone());
            let built_key = self.build(&key_value, info.key_info(), depth + 1)?;
            let built_item = self.build(item, info.value_info(), depth + 1)?;
            target
                .insert(built_key, built_item)
                .map_err(|_| Error::coercion(info.ty().path(), "entry type mismatch"))?;
        }
        Ok(map)
    }

    fn build_struct(
        &self,
        value: &Value,
        info: &StructInfo,
        type_info: &'static TypeInfo,
        depth: usize,
    ) -> Result<Box<dyn Reflect>> {
        let mut instance = info.construct();
        if depth >= self.config.max_depth {
            return Ok(instance);
        }
        let parsed;
        let members = match value {
            Value::Null => return Ok(instance),
            Value::Map(members) => members,
            Value::String(text) if text.trim_start().starts_with('{') => {
                parsed = jsv::parse(text)?;
                match &parsed {
                    Value::Map(members) => members,
                    other => return Err(mismatch(info.ty().path(), "object", other)),
                }
            }
            other => return Err(mismatch(info.ty().path(), "object", other)),
        };

        let type_config = self.types.get(type_info.type_id()).map(AsRef::as_ref);
        let ReflectMut::Struct(target) = instance.reflect_mut() else {
            return Err(Error::coercion(info.ty().path(), "not a struct"));
        };
        for (key, item) in members.iter() {
            if *key == self.config.type_attr {
                continue;
            }
            let Some(field) = find_member(key, info, type_config, self.config) else {
                continue;
            };
            let Some(index) = info.index_of(field.name()) else {
                continue;
            };
            let built = match self.build(item, field.type_info(), depth + 1) {
                Ok(built) => built,
                Err(err) if err.is_not_supported() || self.config.throw_on_error => {
                    return Err(err.in_member(field.name()));
                }
                Err(err) => {
                    warn!("skipped member `{}` of `{}`: {err}", field.name(), info.ty().path());
                    continue;
                }
            };
            if let Some(slot) = target.field_at_mut(index)
                && let Err(rejected) = slot.set(built)
            {
                return Err(Error::coercion(
                    info.ty().path(),
                    format!("member `{}` cannot hold `{}`", field.name(), rejected.reflect_type_path()),
                ));
            }
        }
        Ok(instance)
    }

    /// A hinted map goes through the resolver; anything else is kept as an
    /// untyped [`Value`].
    fn build_object(&self, value: &Value, depth: usize) -> Result<Box<dyn Reflect>> {
        if let Some(hint) = value.get(&self.config.type_attr).and_then(Value::as_str) {
            let info = resolver::resolve(hint)?;
            let built = self.build(value, info, depth)?;
            return Ok(Box::new(Object::from_boxed(built)));
        }
        Ok(Box::new(Object::new(value.clone().normalize(self.config))))
    }
}

/// Text in a list slot: a JSV list, or a bare `a,b,c` sequence.
fn expand_list(text: &str) -> Result<alloc::vec::Vec<Value>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(alloc::vec::Vec::new());
    }
    let parsed = if trimmed.starts_with('[') {
        jsv::parse(trimmed)?
    } else {
        jsv::parse(&format!("[{trimmed}]"))?
    };
    Ok(match parsed {
        Value::List(items) => items,
        other => alloc::vec![other],
    })
}

#[cold]
fn mismatch(type_path: &'static str, expected: &str, found: &Value) -> Error {
    Error::coercion(type_path, format!("expected {expected}, found {}", found.kind_name()))
}

// -----------------------------------------------------------------------------
// Entry points

/// Builds a value of type `info` under `config`.
#[inline]
pub fn from_value(value: &Value, info: &'static TypeInfo, config: &Config) -> Result<Box<dyn Reflect>> {
    Deserializer::new(config).from_value(value, info)
}

/// Builds a `T` under `config`.
///
/// ```
/// use vc_serial::{Value, config::Config, de::from_value_as};
///
/// let list = Value::List(vec![Value::from("1"), Value::from(2)]);
/// assert_eq!(from_value_as::<Vec<u8>>(&list, &Config::default()).unwrap(), vec![1, 2]);
/// ```
pub fn from_value_as<T: Typed + Reflect>(value: &Value, config: &Config) -> Result<T> {
    let info = T::type_info();
    from_value(value, info, config)?
        .take::<T>()
        .map_err(|other| {
            Error::coercion(
                info.type_path(),
                format!("a custom function returned `{}`", other.reflect_type_path()),
            )
        })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use vc_reflect::derive::Reflect;
    use vc_reflect::ops::Object;

    use super::from_value_as;
    use crate::config::tests::lock_global;
    use crate::config::{Config, PropertyConvention, configure_type};
    use crate::format::{json, jsv};
    use crate::value::{Number, Value};

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    struct Line {
        #[reflect(rename = "Qty")]
        qty: u32,
        sku: String,
        tags: Vec<String>,
        note: Option<String>,
    }

    #[derive(Reflect, Clone, Copy, Default, PartialEq, Debug)]
    enum Status {
        #[default]
        Open,
        Closed,
    }

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    struct Order {
        id: i64,
        status: Status,
        lines: Vec<Line>,
        totals: BTreeMap<String, f64>,
        ids: Option<Vec<i32>>,
    }

    #[derive(Reflect, Clone, Default)]
    #[reflect(type_path = "app::dto::Payload")]
    struct Payload {
        size: i32,
    }

    #[derive(Reflect, Clone, Default, Debug)]
    struct Envelope {
        body: Option<Object>,
    }

    fn from_json<T: vc_reflect::info::Typed + vc_reflect::Reflect>(text: &str, config: &Config) -> crate::Result<T> {
        from_value_as::<T>(&json::parse(text).unwrap(), config)
    }

    #[test]
    fn json_and_jsv_build_the_same_graph() {
        let _guard = lock_global();
        let config = Config::default();
        let from_json: Order = from_json(
            r#"{"id":7,"status":"Closed","lines":[{"Qty":2,"sku":"A-1","tags":["x","y"]}],"totals":{"net":1.5}}"#,
            &config,
        )
        .unwrap();
        let from_jsv: Order = from_value_as(
            &jsv::parse("{id:7,status:closed,lines:[{Qty:2,sku:A-1,tags:[x,y]}],totals:{net:1.5}}").unwrap(),
            &config,
        )
        .unwrap();
        assert_eq!(from_json, from_jsv);
        assert_eq!(from_json.status, Status::Closed);
        assert_eq!(from_json.lines[0].tags, ["x", "y"]);
        assert_eq!(from_json.totals.get("net"), Some(&1.5));
        assert_eq!(from_json.ids, None);
    }

    #[test]
    fn null_is_not_empty() {
        let _guard = lock_global();
        let config = Config::default();
        let order: Order = from_value_as(&jsv::parse("{ids:}").unwrap(), &config).unwrap();
        assert_eq!(order.ids, None);
        let order: Order = from_value_as(&jsv::parse("{ids:[]}").unwrap(), &config).unwrap();
        assert_eq!(order.ids, Some(vec![]));
        let order: Order = from_json(r#"{"ids":null}"#, &config).unwrap();
        assert_eq!(order.ids, None);

        let tail: Vec<Option<i32>> = from_value_as(&jsv::parse("[1,,3,]").unwrap(), &config).unwrap();
        assert_eq!(tail, [Some(1), None, Some(3), None]);
    }

    #[test]
    fn list_text_is_expanded() {
        let _guard = lock_global();
        let config = Config::default();
        assert_eq!(from_value_as::<Vec<i32>>(&Value::from("1,2,3"), &config).unwrap(), [1, 2, 3]);
        assert_eq!(from_value_as::<Vec<i32>>(&Value::from("[4,5]"), &config).unwrap(), [4, 5]);
        assert!(from_value_as::<Vec<i32>>(&Value::from(""), &config).unwrap().is_empty());
        assert_eq!(from_value_as::<Vec<String>>(&Value::from("\"a,b\",c"), &config).unwrap(), ["a,b", "c"]);
    }

    #[test]
    fn bad_members_are_skipped_unless_strict() {
        let _guard = lock_global();
        let text = r#"{"Qty":"many","sku":"B"}"#;
        let line: Line = from_json(text, &Config::default()).unwrap();
        assert_eq!(line, Line { sku: "B".into(), ..Line::default() });

        let strict = Config { throw_on_error: true, ..Config::default() };
        let err = from_json::<Line>(text, &strict).unwrap_err();
        assert!(err.to_string().contains("qty"), "{err}");

        assert!(from_json::<u8>("300", &Config::default()).is_err());
        assert_eq!(from_json::<u8>("\"\"", &Config::default()).unwrap(), 0);
    }

    #[test]
    fn lenient_member_names() {
        let _guard = lock_global();
        let lenient = Config { property_convention: PropertyConvention::Lenient, ..Config::default() };
        let line: Line = from_json(r#"{"QTY":3,"S_K_U":"z"}"#, &lenient).unwrap();
        assert_eq!((line.qty, line.sku.as_str()), (3, "z"));
        let line: Line = from_json(r#"{"S_K_U":"z"}"#, &Config::default()).unwrap();
        assert_eq!(line.sku, "");
    }

    #[test]
    fn object_slots_resolve_allowed_types_only() {
        let _guard = lock_global();
        let config = Config::default();
        let text = r#"{"body":{"__type":"app::dto::Payload, app","size":4}}"#;
        let err = from_json::<Envelope>(text, &config).unwrap_err();
        assert!(err.is_not_supported());

        crate::resolver::allow_namespace("app::dto");
        crate::resolver::register_type::<Payload>();
        let envelope: Envelope = from_json(text, &config).unwrap();
        let body = envelope.body.unwrap();
        assert_eq!(body.downcast_ref::<Payload>().map(|p| p.size), Some(4));

        let untyped: Envelope = from_json(r#"{"body":{"a":[1,2]}}"#, &config).unwrap();
        let body = untyped.body.unwrap();
        let value = body.downcast_ref::<Value>().unwrap();
        assert_eq!(value.get("a"), Some(&Value::List(vec![Value::from(Number::I32(1)), Value::from(Number::I32(2))])));
    }

    #[test]
    fn hooks_and_custom_readers() {
        let _guard = lock_global();
        configure_type::<Line>(|tc| {
            tc.set_on_deserialized(|mut line: Line| {
                line.sku.make_ascii_uppercase();
                line
            });
        });
        configure_type::<Status>(|tc| {
            tc.set_deserialize_fn(|text| match text {
                "o" => Ok(Status::Open),
                "c" => Ok(Status::Closed),
                other => Err(format!("unknown status `{other}`")),
            });
        });
        let order: Order = from_json(r#"{"status":"c","lines":[{"sku":"ab"}]}"#, &Config::default()).unwrap();
        assert_eq!(order.status, Status::Closed);
        assert_eq!(order.lines[0].sku, "AB");
    }

    #[test]
    fn depth_cap_returns_defaults() {
        let _guard = lock_global();
        let config = Config { max_depth: 1, ..Config::default() };
        let order: Order = from_json(r#"{"id":1,"lines":[{"sku":"a"}]}"#, &config).unwrap();
        assert_eq!(order.id, 1);
        assert!(order.lines.is_empty());
    }
}
