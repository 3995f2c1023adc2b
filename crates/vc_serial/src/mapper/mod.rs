//! Conversion between reflected values and member dictionaries.
//!
//! An [`ObjectDictionary`] holds one entry per member, keyed by declared
//! name, with each value kept as a reflected copy rather than serialized
//! text. Going back, a value of the member's exact type is assigned as is
//! and anything else is converted through the untyped [`Value`] form, the
//! same path the text readers use: nested dictionaries become structs,
//! numeric text becomes numbers and tick counts become durations.

use alloc::boxed::Box;
use alloc::string::{String, ToString};

use log::warn;
use vc_reflect::Reflect;
use vc_reflect::info::{StructInfo, TypeInfo, Typed};
use vc_reflect::ops::{Object, ReflectMut, ReflectRef};
use vc_utils::collections::OrderedMap;

use crate::config::{Config, type_config_table};
use crate::ser::{Serializer, find_member, is_included};
use crate::value::Value;
use crate::{Error, Result, de};

/// Member values by name.
pub type ObjectDictionary = OrderedMap<String, Object>;

/// The config used for conversions: nulls are kept so `None` members
/// overwrite, and dictionary order is preserved.
fn conversion_config() -> Config {
    Config {
        include_null_values: true,
        include_null_values_in_dictionaries: true,
        ..Config::current()
    }
}

fn lower(value: &dyn Reflect, config: &Config) -> Result<Value> {
    Serializer::new(config).to_value(value)
}

// -----------------------------------------------------------------------------
// To dictionaries

/// One entry per member of a struct, or per entry of a map, in order.
///
/// ```
/// use vc_reflect::derive::Reflect;
/// use vc_serial::mapper::to_object_dictionary;
///
/// #[derive(Reflect, Clone, Default)]
/// struct User { id: i32, name: String }
///
/// let map = to_object_dictionary(&User { id: 4, name: "ann".into() }).unwrap();
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["id", "name"]);
/// assert_eq!(map["id"].downcast_ref::<i32>(), Some(&4));
/// ```
pub fn to_object_dictionary(value: &dyn Reflect) -> Result<ObjectDictionary> {
    to_object_dictionary_with(value, |_, entry| entry)
}

/// Like [`to_object_dictionary`], passing every entry through `transform`.
pub fn to_object_dictionary_with(
    value: &dyn Reflect,
    mut transform: impl FnMut(&str, Object) -> Object,
) -> Result<ObjectDictionary> {
    let mut out = ObjectDictionary::new();
    match value.reflect_ref() {
        ReflectRef::Struct(s) => {
            let info = value.reflect_type_info();
            let TypeInfo::Struct(schema) = info else {
                return Err(Error::coercion(info.type_path(), "struct without struct info"));
            };
            let types = type_config_table();
            let type_config = types.get(info.type_id()).map(AsRef::as_ref);
            let config = Config::current();
            for (index, field) in schema.fields().iter().enumerate() {
                if !is_included(field, schema, info, type_config, &config) {
                    continue;
                }
                if let Some(member) = s.field_at(index) {
                    let entry = Object::from_boxed(member.reflect_clone());
                    out.insert(field.name().to_string(), transform(field.name(), entry));
                }
            }
        }
        ReflectRef::Map(map) => {
            let config = conversion_config();
            for (key, item) in map.iter() {
                let key = match lower(key, &config)? {
                    Value::String(text) => text,
                    other => crate::format::jsv::to_string(&other, &config),
                };
                let entry = Object::from_boxed(item.reflect_clone());
                let entry = transform(&key, entry);
                out.insert(key, entry);
            }
        }
        ReflectRef::Object(object) => return to_object_dictionary_with(object.value(), transform),
        _ => {
            let info = value.reflect_type_info();
            return Err(Error::coercion(info.type_path(), "only structs and maps have members"));
        }
    }
    Ok(out)
}

/// The dictionary of `value` with the members of every value in `others`
/// layered on top, later values winning.
pub fn merge_into_object_dictionary(value: &dyn Reflect, others: &[&dyn Reflect]) -> Result<ObjectDictionary> {
    let mut merged = to_object_dictionary(value)?;
    for other in others {
        merged.extend(to_object_dictionary(*other)?);
    }
    Ok(merged)
}

// -----------------------------------------------------------------------------
// From dictionaries

/// Builds a value of type `info` from a dictionary.
pub fn from_object_dictionary(map: &ObjectDictionary, info: &'static TypeInfo) -> Result<Box<dyn Reflect>> {
    let config = conversion_config();
    match info {
        TypeInfo::Struct(schema) => {
            let mut instance = schema.construct();
            assign_entries(instance.as_mut(), schema, info, map.iter().map(|(k, v)| (k.as_str(), v.value())), &config)?;
            Ok(instance)
        }
        _ => de::from_value(&lower(map, &config)?, info, &config),
    }
}

/// Builds a `T` from a dictionary.
pub fn from_object_dictionary_as<T: Typed + Reflect>(map: &ObjectDictionary) -> Result<T> {
    from_object_dictionary(map, T::type_info())?
        .take::<T>()
        .map_err(|_| Error::coercion(T::type_info().type_path(), "a custom function returned another type"))
}

/// Assigns `entries` to the members of a struct they name.
fn assign_entries<'a>(
    target: &mut dyn Reflect,
    schema: &StructInfo,
    info: &'static TypeInfo,
    entries: impl Iterator<Item = (&'a str, &'a dyn Reflect)>,
    config: &Config,
) -> Result<()> {
    let types = type_config_table();
    let type_config = types.get(info.type_id()).map(AsRef::as_ref);
    let ReflectMut::Struct(fields) = target.reflect_mut() else {
        return Err(Error::coercion(info.type_path(), "not a struct"));
    };
    for (key, entry) in entries {
        let field = schema
            .field(key)
            .or_else(|| find_member(key, schema, type_config, config));
        let Some((field, index)) = field.and_then(|f| Some((f, schema.index_of(f.name())?))) else {
            continue;
        };
        let member_info = field.type_info();
        let converted = if entry.ty_id() == member_info.type_id() {
            Ok(entry.reflect_clone())
        } else {
            lower(entry, config).and_then(|value| de::from_value(&value, member_info, config))
        };
        let converted = match converted {
            Ok(converted) => converted,
            Err(err) if err.is_not_supported() || config.throw_on_error => return Err(err.in_member(field.name())),
            Err(err) => {
                warn!("skipped member `{}` of `{}`: {err}", field.name(), info.type_path());
                continue;
            }
        };
        if let Some(slot) = fields.field_at_mut(index)
            && slot.set(converted).is_err()
        {
            return Err(Error::coercion(info.type_path(), "member type mismatch").in_member(field.name()));
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Conversion

/// Converts `value` into a `T`, matching members by name across unrelated
/// types and retargeting collections.
///
/// ```
/// use std::collections::BTreeSet;
/// use vc_serial::mapper::convert_to;
///
/// let set: BTreeSet<u8> = convert_to(&vec!["3".to_string(), "1".into(), "3".into()]).unwrap();
/// assert_eq!(set.into_iter().collect::<Vec<_>>(), [1, 3]);
/// ```
pub fn convert_to<T: Typed + Reflect>(value: &dyn Reflect) -> Result<T> {
    let info = T::type_info();
    let converted = if value.ty_id() == info.type_id() {
        value.reflect_clone()
    } else {
        let config = conversion_config();
        de::from_value(&lower(value, &config)?, info, &config)?
    };
    converted
        .take::<T>()
        .map_err(|_| Error::coercion(info.type_path(), "a custom function returned another type"))
}

/// Copies every member of `source` that `target` also has into `target`.
///
/// Members are matched by declared name, then as a key would be; members
/// of `source` with no counterpart are ignored.
pub fn populate_instance(target: &mut dyn Reflect, source: &dyn Reflect) -> Result<()> {
    let info = target.reflect_type_info();
    let TypeInfo::Struct(schema) = info else {
        return Err(Error::coercion(info.type_path(), "only structs can be populated"));
    };
    let entries = to_object_dictionary(source)?;
    let config = conversion_config();
    assign_entries(target, schema, info, entries.iter().map(|(k, v)| (k.as_str(), v.value())), &config)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};

    use chrono::TimeDelta;
    use vc_reflect::derive::Reflect;
    use vc_reflect::ops::Object;

    use super::{
        ObjectDictionary, convert_to, from_object_dictionary_as, merge_into_object_dictionary, populate_instance,
        to_object_dictionary, to_object_dictionary_with,
    };
    use crate::config::tests::lock_global;

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    struct Address {
        street: String,
        zip: u32,
    }

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    struct Customer {
        id: i64,
        name: String,
        address: Address,
        tags: Vec<String>,
        timeout: TimeDelta,
        nickname: Option<String>,
    }

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    struct CustomerView {
        #[reflect(rename = "ID")]
        id: i32,
        name: String,
        address: BTreeMap<String, String>,
        tags: HashSet<String>,
    }

    fn customer() -> Customer {
        Customer {
            id: 7,
            name: "Ann".into(),
            address: Address { street: "Main".into(), zip: 1234 },
            tags: vec!["a".into(), "b".into()],
            timeout: TimeDelta::seconds(90),
            nickname: None,
        }
    }

    #[test]
    fn dictionaries_round_trip() {
        let _guard = lock_global();
        let map = to_object_dictionary(&customer()).unwrap();
        assert_eq!(map.len(), 6);
        assert_eq!(map["address"].downcast_ref::<Address>(), Some(&customer().address));
        assert_eq!(from_object_dictionary_as::<Customer>(&map).unwrap(), customer());
    }

    #[test]
    fn values_are_coerced_into_members() {
        let _guard = lock_global();
        let mut address = ObjectDictionary::new();
        address.insert("Street".into(), Object::new(String::from("Elm")));
        address.insert("zip".into(), Object::new(String::from("0042")));

        let mut map = ObjectDictionary::new();
        map.insert("ID".into(), Object::new(9_u8));
        map.insert("address".into(), Object::new(address));
        map.insert("tags".into(), Object::new(HashSet::from([String::from("x")])));
        map.insert("timeout".into(), Object::new(600_000_000_i64));
        map.insert("unknown".into(), Object::new(true));

        let customer: Customer = from_object_dictionary_as(&map).unwrap();
        assert_eq!(customer.id, 9);
        assert_eq!(customer.address, Address { street: "Elm".into(), zip: 42 });
        assert_eq!(customer.tags, ["x"]);
        assert_eq!(customer.timeout, TimeDelta::seconds(60));
    }

    #[test]
    fn transform_and_merge() {
        let _guard = lock_global();
        let map = to_object_dictionary_with(&customer(), |key, value| match key {
            "name" => Object::new(String::from("hidden")),
            _ => value,
        })
        .unwrap();
        assert_eq!(map["name"].downcast_ref::<String>().map(String::as_str), Some("hidden"));

        let patch = Address { street: "Side".into(), zip: 1 };
        let merged = merge_into_object_dictionary(&customer(), &[&patch]).unwrap();
        assert_eq!(merged["street"].downcast_ref::<String>().map(String::as_str), Some("Side"));
        assert_eq!(merged["id"].downcast_ref::<i64>(), Some(&7));
        assert_eq!(merged.keys().last().map(String::as_str), Some("zip"));
    }

    #[test]
    fn conversion_between_unrelated_types() {
        let _guard = lock_global();
        let view: CustomerView = convert_to(&customer()).unwrap();
        assert_eq!(view.id, 7);
        assert_eq!(view.address.get("zip").map(String::as_str), Some("1234"));
        assert!(view.tags.contains("b"));

        let pair: (String, i32) = convert_to(&BTreeMap::from([
            (String::from("Key"), String::from("k")),
            (String::from("Value"), String::from("5")),
        ])).unwrap();
        assert_eq!(pair, ("k".to_string(), 5));
        let back: BTreeMap<String, String> = convert_to(&pair).unwrap();
        assert_eq!(back.get("Value").map(String::as_str), Some("5"));

        assert!(convert_to::<Vec<u8>>(&vec!["300".to_string()]).is_err());
    }

    #[test]
    fn populate_copies_shared_members() {
        let _guard = lock_global();
        let mut target = customer();
        let source = CustomerView { id: 11, name: "Bo".into(), ..CustomerView::default() };
        populate_instance(&mut target, &source).unwrap();
        assert_eq!((target.id, target.name.as_str()), (11, "Bo"));
        assert!(target.tags.is_empty());
        assert_eq!(target.address, Address::default());
    }
}
