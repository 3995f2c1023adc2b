//! Lowering of reflected values into the untyped [`Value`] tree.
//!
//! The [`Serializer`] walks a value through its [`ReflectRef`] view and
//! applies everything that depends on types: member naming and exclusion,
//! null and default handling, type hints, per-type overrides and the depth
//! cap. Format writers only see the resulting tree.
//!
//! # Depth
//!
//! Containers nested deeper than [`Config::max_depth`] are written empty.
//! This is the only guard against runaway nesting; there is no cycle
//! detection.

// -----------------------------------------------------------------------------
// Modules

mod members;

// -----------------------------------------------------------------------------
// Exports

pub use members::{find_member, is_included, wire_name};

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use log::warn;
use vc_reflect::Reflect;
use vc_reflect::info::{ReflectKind, StructInfo, TypeInfo};
use vc_reflect::ops::{ReflectRef, Struct};
use vc_utils::collections::OrderedMap;

use crate::config::{Config, TypeConfigTable, type_config_table};
use crate::convert::date::{DateToken, format_date};
use crate::convert::enums::enum_to_value;
use crate::convert::scalar::scalar_to_value;
use crate::format::jsv;
use crate::value::Value;
use crate::{Error, Format, Result, resolver};

// -----------------------------------------------------------------------------
// Serializer

/// Lowers reflected values under one effective config.
///
/// ```
/// use vc_reflect::derive::Reflect;
/// use vc_serial::{Value, config::Config, ser::Serializer};
///
/// #[derive(Reflect, Clone, Default)]
/// struct Point { x: i32, y: Option<i32> }
///
/// let config = Config::default();
/// let value = Serializer::new(&config).to_value(&Point { x: 1, y: None }).unwrap();
/// assert_eq!(value.get("x"), Some(&Value::from(1)));
/// assert_eq!(value.get("y"), None);
/// ```
pub struct Serializer<'a> {
    config: &'a Config,
    types: TypeConfigTable,
    format: Format,
}

impl<'a> Serializer<'a> {
    /// A serializer for JSON-like output.
    #[inline]
    pub fn new(config: &'a Config) -> Self {
        Self::for_format(config, Format::Json)
    }

    /// A serializer for `format`; map keys holding dates are written the
    /// way `format` writes dates.
    pub fn for_format(config: &'a Config, format: Format) -> Self {
        Self {
            config,
            types: type_config_table(),
            format,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn to_value(&self, value: &dyn Reflect) -> Result<Value> {
        self.lower(value, 0, false)
    }

    fn lower(&self, value: &dyn Reflect, depth: usize, polymorphic: bool) -> Result<Value> {
        if let Some(custom) = self.types.get(value.ty_id()).and_then(|tc| tc.serialize_fn.as_ref()) {
            return match custom(value) {
                Ok(text) => Ok(Value::String(text)),
                Err(message) if self.config.throw_on_error => {
                    Err(Error::custom_function(value.reflect_type_path(), message))
                }
                Err(message) => {
                    warn!("serialize function of `{}` failed: {message}", value.reflect_type_path());
                    Ok(Value::Null)
                }
            };
        }

        let truncated = depth >= self.config.max_depth;
        match value.reflect_ref() {
            ReflectRef::Scalar(scalar) => Ok(scalar_to_value(scalar.scalar_ref(), self.config)),
            ReflectRef::Enum(e) => match value.reflect_type_info() {
                TypeInfo::Enum(info) => Ok(enum_to_value(info, e.discriminant(), self.config)),
                _ => Ok(Value::from(e.discriminant())),
            },
            ReflectRef::Option(option) => match option.value() {
                Some(inner) => self.lower(inner, depth, polymorphic),
                None => Ok(Value::Null),
            },
            ReflectRef::List(_) if truncated => Ok(Value::List(Vec::new())),
            ReflectRef::List(list) => list
                .iter()
                .map(|item| self.lower(item, depth + 1, false))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            ReflectRef::Map(_) if truncated => Ok(Value::Map(OrderedMap::new())),
            ReflectRef::Map(map) => {
                let mut out = OrderedMap::with_capacity(map.len());
                for (key, item) in map.iter() {
                    let item = self.lower(item, depth + 1, false)?;
                    if item.is_null() && !self.config.include_null_values_in_dictionaries {
                        continue;
                    }
                    out.insert(self.key_text(key, depth)?, item);
                }
                Ok(Value::Map(out))
            }
            ReflectRef::Struct(_) if truncated => Ok(Value::Map(OrderedMap::new())),
            ReflectRef::Struct(s) => match value.reflect_type_info() {
                TypeInfo::Struct(info) => self.lower_struct(s, info, value.reflect_type_info(), depth, polymorphic),
                other => Err(Error::coercion(other.type_path(), "struct without struct info")),
            },
            ReflectRef::Object(object) => self.lower(object.value(), depth, true),
            ReflectRef::Opaque(opaque) => match opaque.downcast_ref::<Value>() {
                Some(value) => Ok(value.clone()),
                None => Err(Error::coercion(
                    opaque.reflect_type_path(),
                    "opaque values need a serialize function",
                )),
            },
        }
    }

    fn lower_struct(
        &self,
        value: &dyn Struct,
        info: &StructInfo,
        type_info: &'static TypeInfo,
        depth: usize,
        polymorphic: bool,
    ) -> Result<Value> {
        let config = self.config;
        let type_config = self.types.get(type_info.type_id()).map(AsRef::as_ref);
        let mut out = OrderedMap::with_capacity(info.field_len() + 1);

        let hinted = !config.exclude_type_info
            && !type_config.is_some_and(|tc| tc.exclude_type_info)
            && (polymorphic || config.include_type_info || type_config.is_some_and(|tc| tc.include_type_info));
        if hinted {
            let hint = resolver::type_hint(type_info, config.prefer_interfaces);
            out.insert(config.type_attr.clone(), Value::String(hint.to_string()));
        }

        for (index, field) in info.fields().iter().enumerate() {
            if !is_included(field, info, type_info, type_config, config) {
                continue;
            }
            let Some(member) = value.field_at(index) else {
                continue;
            };
            let lowered = self.lower(member, depth + 1, false)?;
            if lowered.is_null() && !config.include_null_values {
                continue;
            }
            if self.skips_default(member, field.type_info()) {
                continue;
            }
            out.insert(wire_name(field, type_config, config).into_owned(), lowered);
        }
        Ok(Value::Map(out))
    }

    /// Default-valued members are skipped under `exclude_default_values`,
    /// and default enums unless `include_default_enums` is set.
    fn skips_default(&self, member: &dyn Reflect, info: &'static TypeInfo) -> bool {
        let is_enum = info.kind() == ReflectKind::Enum;
        if !self.config.exclude_default_values && (self.config.include_default_enums || !is_enum) {
            return false;
        }
        if self.types.get(info.type_id()).is_some_and(|tc| tc.include_default_value) {
            return false;
        }
        info.construct()
            .is_some_and(|default| member.reflect_partial_eq(default.as_ref()) == Some(true))
    }

    /// Map keys are text: scalars and enums by their text form, anything
    /// else by its JSV text.
    fn key_text(&self, key: &dyn Reflect, depth: usize) -> Result<String> {
        let lowered = self.lower(key, depth + 1, false)?;
        Ok(match lowered {
            Value::String(text) => text,
            Value::Date(date) => match format_date(date, self.config, self.format) {
                DateToken::Text(text) => text,
                DateToken::Escaped(text) => text.replace("\\/", "/"),
                DateToken::Number(n) => n.to_string(),
            },
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            complex @ (Value::List(_) | Value::Map(_)) => jsv::to_string(&complex, self.config),
        })
    }
}

/// Lowers `value` under `config`.
#[inline]
pub fn to_value(value: &dyn Reflect, config: &Config) -> Result<Value> {
    Serializer::new(config).to_value(value)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use vc_reflect::derive::Reflect;
    use vc_reflect::impl_reflect_flags;
    use vc_reflect::ops::Object;
    use vc_utils::collections::OrderedMap;

    use super::to_value;
    use crate::config::tests::lock_global;
    use crate::config::{Config, configure_type};
    use crate::format::json;
    use crate::value::{Number, Value};

    #[derive(Reflect, Clone, Default)]
    struct Exclude {
        #[reflect(rename = "Id")]
        id: i32,
        #[reflect(rename = "Key")]
        key: String,
    }

    #[derive(Reflect, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Debug)]
    enum Color {
        #[default]
        Red = 0,
        Blue = 1,
    }

    bitflags::bitflags! {
        #[derive(Clone, Copy, Default, PartialEq, Debug)]
        struct Perms: u32 {
            const READ = 1;
            const WRITE = 2;
        }
    }

    impl_reflect_flags!(Perms);

    #[derive(Reflect, Clone, Default)]
    struct Paint {
        color: Color,
        perms: Perms,
        note: Option<String>,
        count: i32,
    }

    #[derive(Reflect, Clone, Default)]
    #[reflect(type_path = "app::shapes::Square")]
    struct Square {
        side: u32,
    }

    #[derive(Reflect, Clone, Default)]
    struct Holder {
        shape: Option<Object>,
    }

    #[derive(Reflect, Clone, Default)]
    struct Chain {
        next: Vec<Chain>,
        id: i32,
    }

    fn json_of(value: &dyn vc_reflect::Reflect, config: &Config) -> String {
        json::to_string(&to_value(value, config).unwrap(), config)
    }

    #[test]
    fn exclusion_is_scoped() {
        let _guard = lock_global();
        let value = Exclude { id: 1, key: "Value".into() };
        let mut scoped = Config::current();
        scoped.exclude_property_references.push("Exclude.Id".into());
        {
            let _scope = Config::with(scoped);
            assert_eq!(json_of(&value, &Config::current()), r#"{"Key":"Value"}"#);
        }
        assert_eq!(json_of(&value, &Config::current()), r#"{"Id":1,"Key":"Value"}"#);
    }

    #[test]
    fn enums_flags_nulls_and_defaults() {
        let _guard = lock_global();
        let config = Config::default();
        let paint = Paint { color: Color::Blue, perms: Perms::WRITE, note: None, count: 0 };
        assert_eq!(json_of(&paint, &config), r#"{"color":"Blue","perms":2,"count":0}"#);

        let nulls = Config { include_null_values: true, ..Config::default() };
        assert_eq!(json_of(&paint, &nulls), r#"{"color":"Blue","perms":2,"note":null,"count":0}"#);

        let defaults = Config { exclude_default_values: true, ..Config::default() };
        assert_eq!(json_of(&Paint::default(), &defaults), "{}");

        let no_default_enums = Config { include_default_enums: false, ..Config::default() };
        assert_eq!(json_of(&Paint::default(), &no_default_enums), r#"{"count":0}"#);
    }

    #[test]
    fn maps_keep_order_and_drop_nulls() {
        let _guard = lock_global();
        let config = Config::default();
        let mut map: OrderedMap<String, Option<i32>> = OrderedMap::new();
        map.insert("b".into(), Some(1));
        map.insert("a".into(), None);
        assert_eq!(json_of(&map, &config), r#"{"b":1}"#);

        let with_nulls = Config { include_null_values_in_dictionaries: true, ..Config::default() };
        assert_eq!(json_of(&map, &with_nulls), r#"{"b":1,"a":null}"#);

        let mut by_enum = BTreeMap::new();
        by_enum.insert(Color::Blue, 1_u8);
        assert_eq!(json_of(&by_enum, &config), r#"{"Blue":1}"#);

        let mut by_list: HashMap<Vec<i32>, bool> = HashMap::new();
        by_list.insert(vec![1, 2], true);
        assert_eq!(json_of(&by_list, &config), r#"{"[1,2]":true}"#);
    }

    #[test]
    fn object_slots_carry_type_hints() {
        let _guard = lock_global();
        let config = Config::default();
        let holder = Holder { shape: Some(Object::new(Square { side: 3 })) };
        assert_eq!(json_of(&holder, &config), r#"{"shape":{"__type":"app::shapes::Square","side":3}}"#);

        let no_hints = Config { exclude_type_info: true, ..Config::default() };
        assert_eq!(json_of(&holder, &no_hints), r#"{"shape":{"side":3}}"#);

        let always = Config { include_type_info: true, type_attr: "$type".into(), ..Config::default() };
        assert_eq!(json_of(&Square { side: 1 }, &always), r#"{"$type":"app::shapes::Square","side":1}"#);

        crate::resolver::register_type::<Square>();
        let short = Config { prefer_interfaces: true, ..Config::default() };
        assert_eq!(json_of(&holder, &short), r#"{"shape":{"__type":"Square","side":3}}"#);

        let scalar = Holder { shape: Some(Object::new(5_i64)) };
        assert_eq!(json_of(&scalar, &config), r#"{"shape":5}"#);
    }

    #[test]
    fn depth_is_capped() {
        let _guard = lock_global();
        let deep = Chain {
            id: 1,
            next: vec![Chain { id: 2, next: vec![Chain { id: 3, next: vec![] }] }],
        };
        let config = Config { max_depth: 2, ..Config::default() };
        assert_eq!(json_of(&deep, &config), r#"{"next":[{}],"id":1}"#);
        let config = Config { max_depth: 5, ..Config::default() };
        assert_eq!(json_of(&deep, &config), r#"{"next":[{"next":[{"next":[],"id":3}],"id":2}],"id":1}"#);
    }

    #[test]
    fn custom_functions_and_failures() {
        let _guard = lock_global();
        configure_type::<Square>(|tc| {
            tc.set_serialize_fn(|square: &Square| match square.side {
                0 => Err("zero side".into()),
                side => Ok(format!("{side}x{side}")),
            });
        });
        let config = Config::default();
        assert_eq!(json_of(&Square { side: 2 }, &config), r#""2x2""#);
        assert_eq!(json_of(&vec![Square { side: 0 }, Square { side: 1 }], &config), r#"[null,"1x1"]"#);

        let strict = Config { throw_on_error: true, ..Config::default() };
        let err = to_value(&Square { side: 0 }, &strict).unwrap_err();
        assert!(err.to_string().contains("zero side"));
        assert_eq!(json_of(&7_u16, &strict), "7");
    }

    #[test]
    fn type_config_renames_and_excludes() {
        let _guard = lock_global();
        configure_type::<Exclude>(|tc| {
            tc.rename("key", "k").exclude("id");
        });
        let value = Exclude { id: 1, key: "v".into() };
        assert_eq!(json_of(&value, &Config::default()), r#"{"k":"v"}"#);
        assert_eq!(to_value(&1_u8, &Config::default()).unwrap(), Value::Number(Number::U8(1)));
    }
}
