//! Reflection driven JSON, JSV and CSV serializers.
//!
//! Values are lowered through their [`Reflect`] view into an untyped
//! [`Value`] tree, which a format writer turns into text. Reading runs the
//! other way: a format reader produces a `Value`, and the deserializer
//! builds the declared type from it, resolving type hints in polymorphic
//! [`Object`](vc_reflect::ops::Object) slots through an allow-list.
//!
//! ```
//! use vc_reflect::derive::Reflect;
//!
//! #[derive(Reflect, Clone, Default, PartialEq, Debug)]
//! struct Point { x: i32, y: i32 }
//!
//! let json = vc_serial::to_json(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(json, r#"{"x":1,"y":2}"#);
//! assert_eq!(vc_serial::to_jsv(&Point { x: 1, y: 2 }).unwrap(), "{x:1,y:2}");
//! assert_eq!(vc_serial::from_jsv::<Point>("{x:1,y:2}").unwrap(), Point { x: 1, y: 2 });
//! ```
//!
//! Settings come from [`config::Config::current`]; the `_with` variants
//! take an explicit [`config::Config`] instead.
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod config;
pub mod convert;
pub mod csv;
pub mod de;
pub mod format;
pub mod mapper;
pub mod resolver;
pub mod ser;
pub mod value;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::{Error, Format, Result};
pub use format::indent_json;
pub use value::{JsonObject, Number, Value};

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use vc_reflect::Reflect;
use vc_reflect::info::Typed;

use crate::config::Config;
use crate::format::{json, jsv};
use crate::ser::Serializer;

// -----------------------------------------------------------------------------
// Writing

/// Writes `value` as JSON under `config`, indented when
/// [`Config::indent`] is set.
pub fn to_json_with(value: &dyn Reflect, config: &Config) -> Result<String> {
    let lowered = Serializer::for_format(config, Format::Json).to_value(value)?;
    let text = json::to_string(&lowered, config);
    Ok(if config.indent { indent_json(&text) } else { text })
}

#[inline]
pub fn to_json(value: &dyn Reflect) -> Result<String> {
    to_json_with(value, &Config::current())
}

pub fn to_jsv_with(value: &dyn Reflect, config: &Config) -> Result<String> {
    let lowered = Serializer::for_format(config, Format::Jsv).to_value(value)?;
    Ok(jsv::to_string(&lowered, config))
}

#[inline]
pub fn to_jsv(value: &dyn Reflect) -> Result<String> {
    to_jsv_with(value, &Config::current())
}

#[inline]
pub fn to_csv_with(value: &dyn Reflect, config: &Config) -> Result<String> {
    csv::to_csv(value, config)
}

#[inline]
pub fn to_csv(value: &dyn Reflect) -> Result<String> {
    csv::to_csv(value, &Config::current())
}

/// Writes a list with the columns of `Narrow`.
#[inline]
pub fn to_csv_as<Narrow: Typed>(value: &dyn Reflect) -> Result<String> {
    csv::to_csv_as(value, Narrow::type_info(), &Config::current())
}

/// Writes `value` in `format` to `out`.
///
/// ```
/// use vc_serial::{Format, serialize_to_writer};
///
/// let mut out = String::from("ids=");
/// serialize_to_writer(&vec![1, 2], &mut out, Format::Jsv).unwrap();
/// assert_eq!(out, "ids=[1,2]");
/// ```
pub fn serialize_to_writer(value: &dyn Reflect, out: &mut impl Write, format: Format) -> Result<()> {
    let config = Config::current();
    let text = match format {
        Format::Json => to_json_with(value, &config)?,
        Format::Jsv => to_jsv_with(value, &config)?,
        Format::Csv => csv::to_csv(value, &config)?,
    };
    out.write_str(&text)
        .map_err(|_| Error::external(alloc::format!("writing {format} output failed")))
}

/// One compact JSON document per line, each line ending in `\n`. A value
/// that is not a list is written as a single line.
pub fn to_jsonl(value: &dyn Reflect) -> Result<String> {
    let config = Config { indent: false, ..Config::current() };
    let lowered = Serializer::for_format(&config, Format::Json).to_value(value)?;
    let mut out = String::new();
    let items = match &lowered {
        Value::List(items) => items.as_slice(),
        single => core::slice::from_ref(single),
    };
    for item in items {
        json::write_value(&mut out, item, &config);
        out.push('\n');
    }
    Ok(out)
}

// -----------------------------------------------------------------------------
// Reading

pub fn from_json_with<T: Typed + Reflect>(text: &str, config: &Config) -> Result<T> {
    de::from_value_as(&json::parse(text)?, config)
}

#[inline]
pub fn from_json<T: Typed + Reflect>(text: &str) -> Result<T> {
    from_json_with(text, &Config::current())
}

pub fn from_jsv_with<T: Typed + Reflect>(text: &str, config: &Config) -> Result<T> {
    de::from_value_as(&jsv::parse(text)?, config)
}

#[inline]
pub fn from_jsv<T: Typed + Reflect>(text: &str) -> Result<T> {
    from_jsv_with(text, &Config::current())
}

pub fn from_csv_with<T: Typed + Reflect>(text: &str, config: &Config) -> Result<T> {
    de::from_value_as(&csv::parse_as(text, T::type_info(), config), config)
}

#[inline]
pub fn from_csv<T: Typed + Reflect>(text: &str) -> Result<T> {
    from_csv_with(text, &Config::current())
}

/// Reads one `T` per non-blank line.
pub fn from_jsonl<T: Typed + Reflect>(text: &str) -> Result<Vec<T>> {
    let config = Config::current();
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| from_json_with(line, &config))
        .collect()
}

/// Parses JSON into an untyped [`Value`], applying the inference settings
/// of the current config.
///
/// ```
/// use vc_serial::{Number, Value, config::Config, parse_json};
///
/// let _scope = Config::with(Config::parse("ipf").unwrap());
/// let value = parse_json(r#"{"small":127,"big":32768}"#).unwrap();
/// assert_eq!(value.get("small"), Some(&Value::Number(Number::U8(127))));
/// assert_eq!(value.get("big"), Some(&Value::Number(Number::U16(32768))));
/// ```
pub fn parse_json(text: &str) -> Result<Value> {
    Ok(json::parse(text)?.normalize(&Config::current()))
}

/// Parses JSV into an untyped [`Value`]. Scalars stay text unless the
/// current config asks for primitive inference.
pub fn parse_jsv(text: &str) -> Result<Value> {
    Ok(jsv::parse(text)?.normalize(&Config::current()))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use proptest::collection::vec as vec_of;
    use proptest::prelude::*;
    use vc_reflect::derive::Reflect;
    use vc_reflect::ops::Object;

    use crate::config::tests::lock_global;
    use crate::config::{Config, TextCase, configure_type};
    use crate::{Number, Value};

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    struct Foo {
        #[reflect(rename = "FooBar")]
        foo_bar: String,
    }

    #[derive(Reflect, Clone, Default, Debug)]
    #[reflect(type_path = "app::family::Parent")]
    struct Parent {
        id: i32,
        children: Vec<Child>,
    }

    #[derive(Reflect, Clone, Default, Debug)]
    #[reflect(type_path = "app::family::Child")]
    struct Child {
        name: String,
        parent: Option<Object>,
    }

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    struct Sample {
        id: i64,
        port: u16,
        label: String,
        scores: Vec<i32>,
        active: Option<bool>,
    }

    fn sample() -> impl Strategy<Value = Sample> {
        (any::<i64>(), any::<u16>(), "\\PC{0,16}", vec_of(any::<i32>(), 0..4), any::<Option<bool>>()).prop_map(
            |(id, port, label, scores, active)| Sample { id, port, label, scores, active },
        )
    }

    proptest! {
        #[test]
        fn values_round_trip(value in sample()) {
            let _guard = lock_global();
            let config = Config::default();
            let json = super::to_json_with(&value, &config).unwrap();
            prop_assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());
            prop_assert_eq!(&super::from_json_with::<Sample>(&json, &config).unwrap(), &value);

            let jsv = super::to_jsv_with(&value, &config).unwrap();
            prop_assert_eq!(&super::from_jsv_with::<Sample>(&jsv, &config).unwrap(), &value);
        }
    }

    #[test]
    fn html_escaping() {
        let _guard = lock_global();
        let foo = Foo { foo_bar: "<script></script>".into() };
        assert_eq!(super::to_json_with(&foo, &Config::default()).unwrap(), r#"{"FooBar":"<script></script>"}"#);

        let escaped = Config { escape_html_chars: true, ..Config::default() };
        let json = super::to_json_with(&foo, &escaped).unwrap();
        assert_eq!(json, r#"{"FooBar":"\u003cscript\u003e\u003c/script\u003e"}"#);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["FooBar"], "<script></script>");
        assert_eq!(super::from_json_with::<Foo>(&json, &escaped).unwrap(), foo);
    }

    #[test]
    fn back_references_survive_through_depth_and_hints() {
        let _guard = lock_global();
        crate::resolver::register_type::<Parent>();
        let mut parent = Parent { id: 5, children: vec![] };
        let snapshot = parent.clone();
        parent.children.push(Child { name: "c".into(), parent: Some(Object::new(snapshot)) });

        let config = Config { prefer_interfaces: true, ..Config::default() };
        let json = super::to_json_with(&parent, &config).unwrap();
        assert_eq!(
            json,
            r#"{"id":5,"children":[{"name":"c","parent":{"__type":"Parent","id":5,"children":[]}}]}"#
        );

        configure_type::<Parent>(|tc| {
            tc.set_on_deserialized(|mut parent: Parent| {
                let id = parent.id;
                for child in &mut parent.children {
                    if child.parent.is_none() {
                        child.parent = Some(Object::new(Parent { id, children: vec![] }));
                    }
                }
                parent
            });
        });
        let back: Parent = super::from_json_with(&json, &config).unwrap();
        let child_parent = back.children[0].parent.as_ref().unwrap();
        assert_eq!(child_parent.downcast_ref::<Parent>().map(|p| p.id), Some(back.id));

        let orphan: Parent = super::from_json_with(r#"{"id":8,"children":[{"name":"o"}]}"#, &config).unwrap();
        let adopted = orphan.children[0].parent.as_ref().unwrap();
        assert_eq!(adopted.downcast_ref::<Parent>().map(|p| p.id), Some(8));

        let shallow = Config { max_depth: 3, ..config };
        assert_eq!(super::to_json_with(&parent, &shallow).unwrap(), r#"{"id":5,"children":[{"name":"c","parent":{}}]}"#);
    }

    #[test]
    fn unregistered_hints_are_refused() {
        let _guard = lock_global();
        let json = r#"{"name":"x","parent":{"__type":"Some.Unregistered.Type, SomeAssembly","id":1}}"#;
        assert!(super::from_json::<Child>(json).unwrap_err().is_not_supported());

        let json = r#"{"name":"x","parent":{"__type":"app::family::Parent, app","id":1}}"#;
        assert!(super::from_json::<Child>(json).unwrap_err().is_not_supported());
        crate::resolver::register_type::<Parent>();
        let child: Child = super::from_json(json).unwrap();
        assert_eq!(child.parent.unwrap().downcast_ref::<Parent>().map(|p| p.id), Some(1));
    }

    #[test]
    fn null_empty_and_tails() {
        let _guard = lock_global();
        assert_eq!(super::from_jsv::<Option<Vec<i32>>>("").unwrap(), None);
        assert_eq!(super::from_jsv::<Option<Vec<i32>>>("[]").unwrap(), Some(vec![]));
        assert_eq!(super::from_json::<Option<Vec<i32>>>("null").unwrap(), None);
        assert_eq!(super::from_json::<Option<Vec<i32>>>("[]").unwrap(), Some(vec![]));

        let tail = vec![Some(1), None];
        let json = super::to_json_with(&tail, &Config::default()).unwrap();
        assert_eq!(json, "[1,null]");
        assert_eq!(super::from_json::<Vec<Option<i32>>>(&json).unwrap(), tail);
        let jsv = super::to_jsv_with(&tail, &Config::default()).unwrap();
        assert_eq!(jsv, "[1,]");
        assert_eq!(super::from_jsv::<Vec<Option<i32>>>(&jsv).unwrap(), tail);

        let lone = vec![None::<i32>];
        let jsv = super::to_jsv_with(&lone, &Config::default()).unwrap();
        assert_eq!(jsv, "[null]");
        assert_eq!(super::from_jsv::<Vec<Option<i32>>>(&jsv).unwrap(), lone);

        let nested = vec![vec![None::<i32>], vec![Some(1)]];
        let jsv = super::to_jsv_with(&nested, &Config::default()).unwrap();
        assert_eq!(jsv, "[[null],[1]]");
        assert_eq!(super::from_jsv::<Vec<Vec<Option<i32>>>>(&jsv).unwrap(), nested);
        assert_eq!(super::from_jsv::<Vec<String>>(r#"["null"]"#).unwrap(), ["null"]);
    }

    #[test]
    fn json_lines() {
        let _guard = lock_global();
        let items = vec![Foo { foo_bar: "a".into() }, Foo { foo_bar: "b\nc".into() }];
        let text = super::to_jsonl(&items).unwrap();
        assert_eq!(text, "{\"FooBar\":\"a\"}\n{\"FooBar\":\"b\\nc\"}\n");
        assert_eq!(super::from_jsonl::<Foo>(&text).unwrap(), items);
    }

    #[test]
    fn scoped_and_indented_output() {
        let _guard = lock_global();
        let config = Config { text_case: TextCase::SnakeCase, indent: true, ..Config::default() };
        // an explicit rename wins over the text case
        let text = super::to_json_with(&Foo { foo_bar: "x".into() }, &config).unwrap();
        assert_eq!(text, "{\n  \"FooBar\": \"x\"\n}");

        let _scope = Config::with(Config { treat_enum_as_integer: true, ..Config::default() });
        assert_eq!(super::parse_jsv("{a:1}").unwrap().get("a"), Some(&Value::from("1")));
        let _inner = Config::with(Config { try_parse_primitive_values: true, ..Config::default() });
        assert_eq!(super::parse_jsv("{a:1}").unwrap().get("a"), Some(&Value::Number(Number::I32(1))));
    }
}
