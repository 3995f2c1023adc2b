use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;

use vc_utils::collections::OrderedMap;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{MapInfo, ReflectKind, TypeInfo, TypePath, Typed};
use crate::ops::{Map, ReflectMut, ReflectRef};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

macro_rules! impl_reflect_map {
    (
        {$($generics:tt)*} $ty:ty where {$($bounds:tt)*},
        path = $path:literal, ident = $ident:literal, module = $module:literal
    ) => {
        impl<$($generics)*> TypePath for $ty where $($bounds)* {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    concat(&[$path, "<", K::type_path(), ", ", V::type_path(), ">"])
                })
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    concat(&[$ident, "<", K::type_name(), ", ", V::type_name(), ">"])
                })
            }

            #[inline]
            fn type_ident() -> &'static str {
                $ident
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some($module)
            }
        }

        impl<$($generics)*> Typed for $ty where $($bounds)* {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Map(MapInfo::new::<Self, K, V>(|| {
                        Box::new(<$ty as Default>::default())
                    }))
                })
            }
        }

        impl<$($generics)*> Reflect for $ty where $($bounds)* {
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> ReflectKind {
                ReflectKind::Map
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Map(self)
            }

            #[inline]
            fn reflect_clone(&self) -> Box<dyn Reflect> {
                Box::new(Clone::clone(self))
            }
        }

        impl<$($generics)*> Map for $ty where $($bounds)* {
            #[inline]
            fn len(&self) -> usize {
                Self::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new(
                    Self::iter(self).map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
                )
            }

            fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect> {
                key.downcast_ref::<K>()
                    .and_then(|key| Self::get(self, key))
                    .map(|v| v as &dyn Reflect)
            }

            fn insert(
                &mut self,
                key: Box<dyn Reflect>,
                value: Box<dyn Reflect>,
            ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)> {
                let key = match key.take::<K>() {
                    Ok(key) => key,
                    Err(key) => return Err((key, value)),
                };
                let value = match value.take::<V>() {
                    Ok(value) => value,
                    Err(value) => return Err((Box::new(key), value)),
                };
                Self::insert(self, key, value);
                Ok(())
            }

            #[inline]
            fn clear(&mut self) {
                Self::clear(self);
            }
        }

        impl<$($generics)*> GetTypeMeta for $ty
        where
            $($bounds)*,
            K: GetTypeMeta,
            V: GetTypeMeta,
        {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::with_capacity::<Self>(1);
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<K>();
                registry.register::<V>();
            }
        }
    };
}

impl_reflect_map!(
    {K, V, S} HashMap<K, V, S> where {
        K: Reflect + Typed + Clone + Eq + Hash,
        V: Reflect + Typed + Clone,
        S: BuildHasher + Default + Clone + Send + Sync + 'static
    },
    path = "std::collections::HashMap", ident = "HashMap", module = "std::collections"
);

impl_reflect_map!(
    {K, V} BTreeMap<K, V> where {
        K: Reflect + Typed + Clone + Ord,
        V: Reflect + Typed + Clone
    },
    path = "alloc::collections::BTreeMap", ident = "BTreeMap", module = "alloc::collections"
);

impl_reflect_map!(
    {K, V} OrderedMap<K, V> where {
        K: Reflect + Typed + Clone + Eq + Hash,
        V: Reflect + Typed + Clone
    },
    path = "vc_utils::collections::OrderedMap", ident = "OrderedMap",
    module = "vc_utils::collections"
);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use vc_utils::collections::OrderedMap;

    use crate::info::{ReflectKind, TypePath, Typed};
    use crate::ops::Map;

    #[test]
    fn map_type_info() {
        type Dict = OrderedMap<String, Option<i64>>;
        assert_eq!(
            Dict::type_path(),
            "vc_utils::collections::OrderedMap<alloc::string::String, core::option::Option<i64>>"
        );
        let info = Dict::type_info().as_map().unwrap();
        assert_eq!(info.key_info().kind(), ReflectKind::Scalar);
        assert_eq!(info.value_info().kind(), ReflectKind::Option);
    }

    #[test]
    fn insert_keeps_order_and_checks_types() {
        let mut map: OrderedMap<String, u8> = OrderedMap::new();
        let dyn_map: &mut dyn Map = &mut map;
        assert!(dyn_map.insert(Box::new(String::from("b")), Box::new(1_u8)).is_ok());
        assert!(dyn_map.insert(Box::new(String::from("a")), Box::new(2_u8)).is_ok());
        assert!(dyn_map.insert(Box::new(1_u8), Box::new(2_u8)).is_err());

        let keys: alloc::vec::Vec<&str> = dyn_map
            .iter()
            .filter_map(|(k, _)| k.downcast_ref::<String>().map(String::as_str))
            .collect();
        assert_eq!(keys, ["b", "a"]);

        let value = dyn_map.get(&String::from("a")).unwrap();
        assert_eq!(value.downcast_ref::<u8>(), Some(&2));
    }
}
