use alloc::boxed::Box;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{NamedField, ReflectKind, StructInfo, TypeInfo, TypePath, Typed};
use crate::ops::{ReflectMut, ReflectRef, Struct};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

// A two-element tuple reflects as a key/value pair struct.

impl<K: TypePath, V: TypePath> TypePath for (K, V) {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["(", K::type_path(), ", ", V::type_path(), ")"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["(", K::type_name(), ", ", V::type_name(), ")"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "(K, V)"
    }
}

impl<K, V> Typed for (K, V)
where
    K: Reflect + Typed + Clone + Default,
    V: Reflect + Typed + Clone + Default,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Struct(StructInfo::new::<Self>(&[
                NamedField::new::<K>("Key"),
                NamedField::new::<V>("Value"),
            ]))
        })
    }
}

impl<K, V> Reflect for (K, V)
where
    K: Reflect + Typed + Clone + Default,
    V: Reflect + Typed + Clone + Default,
{
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Struct
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Struct(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Struct(self)
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }
}

impl<K, V> Struct for (K, V)
where
    K: Reflect + Typed + Clone + Default,
    V: Reflect + Typed + Clone + Default,
{
    fn field(&self, name: &str) -> Option<&dyn Reflect> {
        match name {
            "Key" => Some(&self.0),
            "Value" => Some(&self.1),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
        match name {
            "Key" => Some(&mut self.0),
            "Value" => Some(&mut self.1),
            _ => None,
        }
    }

    fn field_at(&self, index: usize) -> Option<&dyn Reflect> {
        match index {
            0 => Some(&self.0),
            1 => Some(&self.1),
            _ => None,
        }
    }

    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        match index {
            0 => Some(&mut self.0),
            1 => Some(&mut self.1),
            _ => None,
        }
    }

    #[inline]
    fn field_len(&self) -> usize {
        2
    }
}

impl<K, V> GetTypeMeta for (K, V)
where
    K: Reflect + GetTypeMeta + Clone + Default,
    V: Reflect + GetTypeMeta + Clone + Default,
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

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::info::Typed;
    use crate::ops::Struct;

    #[test]
    fn pair_is_key_value_struct() {
        let info = <(String, i32)>::type_info().as_struct().unwrap();
        assert_eq!(info.field_names(), ["Key", "Value"]);

        let pair = (String::from("k"), 3_i32);
        assert_eq!(pair.field("Value").unwrap().downcast_ref::<i32>(), Some(&3));
        assert!(pair.field("Other").is_none());
    }
}
