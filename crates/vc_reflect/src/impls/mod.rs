//! Reflection impls for foreign types, plus helpers for writing impls.
//!
//! - [`concat`]: string concatenation for generic type paths.
//! - [`NonGenericTypeInfoCell`], [`GenericTypeInfoCell`], [`GenericTypePathCell`]:
//!   static storage used by [`Typed`] and [`TypePath`] impls.
//! - [`reflect_partial_eq`] / [`reflect_debug`]: kind-driven defaults of
//!   the matching [`Reflect`] methods.
//! - [`impl_reflect_flags!`](crate::impl_reflect_flags): reflects a
//!   `bitflags` type as a flags enum.
//!
//! ## Implemented types
//!
//! - scalars: `bool`, `char`, `i8`-`i128`, `isize`, `u8`-`u128`, `usize`,
//!   `f32`, `f64`, `String`, [`Bytes`](crate::ops::Bytes), `uuid::Uuid`,
//!   `chrono::{DateTime<Utc>, DateTime<FixedOffset>, NaiveDateTime, NaiveDate, TimeDelta}`
//! - `Option<T>`
//! - lists: `Vec<T>`, `VecDeque<T>`, `HashSet<T>`, `BTreeSet<T>`
//! - maps: `HashMap<K, V>`, `BTreeMap<K, V>`, `vc_utils::collections::OrderedMap<K, V>`
//! - `(K, V)` as a `Key`/`Value` struct
//!
//! [`Typed`]: crate::info::Typed
//! [`TypePath`]: crate::info::TypePath

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod flags;
mod list;
mod map;
mod option;
mod pair;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeInfoCell};
pub use flags::FlagBits;

use alloc::string::String;
use core::fmt;

use crate::Reflect;
use crate::ops::ReflectRef;

/// Concatenates string slices with a single allocation.
///
/// ```
/// use vc_reflect::impls;
///
/// let s = impls::concat(&["alloc::vec::Vec", "<", "i32", ">"]);
/// assert_eq!(s, "alloc::vec::Vec<i32>");
/// assert_eq!(s.capacity(), 20);
/// ```
#[inline(never)]
pub fn concat(arr: &[&str]) -> String {
    let len = arr.iter().map(|s| s.len()).sum();
    let mut res = String::with_capacity(len);
    for &item in arr {
        res.push_str(item);
    }
    res
}

/// Structural equality over the kind views.
///
/// - Values of different kinds are unequal.
/// - Enums compare type and discriminant.
/// - Maps compare length, then look every key up in `other`.
/// - Opaque values are not comparable and yield `None`.
///
/// An `Object` on either side is compared by the value it holds.
#[inline(never)]
pub fn reflect_partial_eq(this: ReflectRef<'_>, other: &dyn Reflect) -> Option<bool> {
    let other = match other.reflect_ref() {
        ReflectRef::Object(object) => object.value(),
        _ => other,
    };

    match (this, other.reflect_ref()) {
        (ReflectRef::Scalar(x), ReflectRef::Scalar(y)) => Some(x.scalar_ref() == y.scalar_ref()),
        (ReflectRef::Enum(x), ReflectRef::Enum(y)) => {
            Some(x.ty_id() == y.ty_id() && x.discriminant() == y.discriminant())
        }
        (ReflectRef::Option(x), ReflectRef::Option(y)) => match (x.value(), y.value()) {
            (None, None) => Some(true),
            (Some(x), Some(y)) => x.reflect_partial_eq(y),
            _ => Some(false),
        },
        (ReflectRef::List(x), ReflectRef::List(y)) => {
            if x.len() != y.len() {
                return Some(false);
            }
            for (a, b) in x.iter().zip(y.iter()) {
                if !a.reflect_partial_eq(b)? {
                    return Some(false);
                }
            }
            Some(true)
        }
        (ReflectRef::Map(x), ReflectRef::Map(y)) => {
            if x.len() != y.len() {
                return Some(false);
            }
            for (key, a) in x.iter() {
                let Some(b) = y.get(key) else {
                    return Some(false);
                };
                if !a.reflect_partial_eq(b)? {
                    return Some(false);
                }
            }
            Some(true)
        }
        (ReflectRef::Struct(x), ReflectRef::Struct(y)) => {
            if x.ty_id() != y.ty_id() {
                return Some(false);
            }
            for index in 0..x.field_len() {
                match (x.field_at(index), y.field_at(index)) {
                    (Some(a), Some(b)) => {
                        if !a.reflect_partial_eq(b)? {
                            return Some(false);
                        }
                    }
                    _ => return Some(false),
                }
            }
            Some(true)
        }
        (ReflectRef::Object(x), _) => x.value().reflect_partial_eq(other),
        (ReflectRef::Opaque(_), _) | (_, ReflectRef::Opaque(_)) => None,
        _ => Some(false),
    }
}

/// Debug output over the kind views.
#[inline(never)]
pub fn reflect_debug(
    this: ReflectRef<'_>,
    type_path: &str,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match this {
        ReflectRef::Scalar(x) => fmt::Debug::fmt(&x.scalar_ref(), f),
        ReflectRef::Enum(x) => {
            let info = x.reflect_type_info();
            let variant = info
                .as_enum()
                .ok()
                .and_then(|info| info.variant_with_discriminant(x.discriminant()));
            match variant {
                Some(variant) => write!(f, "{}::{}", info.type_name(), variant.name()),
                None => write!(f, "{}({})", info.type_name(), x.discriminant()),
            }
        }
        ReflectRef::Option(x) => match x.value() {
            Some(value) => f.debug_tuple("Some").field(&value).finish(),
            None => f.write_str("None"),
        },
        ReflectRef::List(x) => f.debug_list().entries(x.iter()).finish(),
        ReflectRef::Map(x) => f.debug_map().entries(x.iter()).finish(),
        ReflectRef::Struct(x) => {
            let info = x.reflect_type_info();
            let mut debug = f.debug_struct(info.type_name());
            if let Ok(info) = info.as_struct() {
                for (index, field) in info.fields().iter().enumerate() {
                    if let Some(value) = x.field_at(index) {
                        debug.field(field.name(), &value);
                    }
                }
            }
            debug.finish()
        }
        ReflectRef::Object(x) => fmt::Debug::fmt(x, f),
        ReflectRef::Opaque(_) => write!(f, "{type_path}(..)"),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;

    use crate::Reflect;
    use crate::ops::Object;

    #[test]
    fn lists_compare_itemwise() {
        let a = vec![Some(1_i32), None];
        let b = vec![Some(1_i32), None];
        let c = vec![Some(1_i32)];
        assert_eq!(a.reflect_partial_eq(&b), Some(true));
        assert_eq!(a.reflect_partial_eq(&c), Some(false));
    }

    #[test]
    fn maps_ignore_order() {
        let mut a = BTreeMap::new();
        a.insert(String::from("x"), 1_u8);
        a.insert(String::from("y"), 2_u8);
        let b: vc_utils::collections::OrderedMap<String, u8> =
            [(String::from("y"), 2), (String::from("x"), 1)].into_iter().collect();
        assert_eq!(a.reflect_partial_eq(&b), Some(true));

        a.insert(String::from("z"), 3);
        assert_eq!(a.reflect_partial_eq(&b), Some(false));
    }

    #[test]
    fn object_compares_its_value() {
        let object = Object::new(5_u32);
        assert_eq!(object.reflect_partial_eq(&5_u32), Some(true));
        assert_eq!(5_u32.reflect_partial_eq(&object), Some(true));
        assert_eq!(object.reflect_partial_eq(&6_u32), Some(false));
    }

    #[test]
    fn scalars_of_different_types_differ() {
        assert_eq!(1_i32.reflect_partial_eq(&1_i64), Some(false));
    }

    #[test]
    fn debug_output() {
        let value: &dyn Reflect = &vec![Some(String::from("a")), None];
        assert_eq!(alloc::format!("{value:?}"), r#"[Some("a"), None]"#);
        let scalar: &dyn Reflect = &7_u8;
        assert_eq!(alloc::format!("{scalar:?}"), "7");
    }
}
