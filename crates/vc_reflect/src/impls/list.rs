use alloc::boxed::Box;
use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};
use std::collections::HashSet;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{ListInfo, ListKind, ReflectKind, TypeInfo, TypePath, Typed};
use crate::ops::{List, ReflectMut, ReflectRef};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

macro_rules! impl_reflect_list {
    (
        {$($generics:tt)*} $ty:ty where {$($bounds:tt)*},
        path = $path:literal, ident = $ident:literal, module = $module:literal, kind = $kind:ident
    ) => {
        impl<$($generics)*> TypePath for $ty where $($bounds)* {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| concat(&[$path, "<", T::type_path(), ">"]))
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| concat(&[$ident, "<", T::type_name(), ">"]))
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
                    TypeInfo::List(ListInfo::new::<Self, T>(ListKind::$kind, || {
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
                ReflectKind::List
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::List(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::List(self)
            }

            #[inline]
            fn reflect_clone(&self) -> Box<dyn Reflect> {
                Box::new(Clone::clone(self))
            }
        }

        impl<$($generics)*> GetTypeMeta for $ty where $($bounds)*, T: GetTypeMeta {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::with_capacity::<Self>(1);
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<T>();
            }
        }
    };
}

impl_reflect_list!(
    {T} Vec<T> where {T: Reflect + Typed + Clone},
    path = "alloc::vec::Vec", ident = "Vec", module = "alloc::vec", kind = Sequence
);

impl_reflect_list!(
    {T} VecDeque<T> where {T: Reflect + Typed + Clone},
    path = "alloc::collections::VecDeque", ident = "VecDeque",
    module = "alloc::collections", kind = Sequence
);

impl_reflect_list!(
    {T, S} HashSet<T, S> where {
        T: Reflect + Typed + Clone + Eq + Hash,
        S: BuildHasher + Default + Clone + Send + Sync + 'static
    },
    path = "std::collections::HashSet", ident = "HashSet",
    module = "std::collections", kind = Set
);

impl_reflect_list!(
    {T} BTreeSet<T> where {T: Reflect + Typed + Clone + Ord},
    path = "alloc::collections::BTreeSet", ident = "BTreeSet",
    module = "alloc::collections", kind = Set
);

impl<T: Reflect + Typed + Clone> List for Vec<T> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|v| v as &dyn Reflect)
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(self.as_slice().iter().map(|v| v as &dyn Reflect))
    }

    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        Vec::push(self, value.take::<T>()?);
        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<T: Reflect + Typed + Clone> List for VecDeque<T> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        VecDeque::get(self, index).map(|v| v as &dyn Reflect)
    }

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(VecDeque::iter(self).map(|v| v as &dyn Reflect))
    }

    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        self.push_back(value.take::<T>()?);
        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        VecDeque::clear(self);
    }
}

impl<T, S> List for HashSet<T, S>
where
    T: Reflect + Typed + Clone + Eq + Hash,
    S: BuildHasher + Default + Clone + Send + Sync + 'static,
{
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        HashSet::iter(self).nth(index).map(|v| v as &dyn Reflect)
    }

    #[inline]
    fn len(&self) -> usize {
        HashSet::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(HashSet::iter(self).map(|v| v as &dyn Reflect))
    }

    /// Duplicates are dropped.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        self.insert(value.take::<T>()?);
        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        HashSet::clear(self);
    }
}

impl<T: Reflect + Typed + Clone + Ord> List for BTreeSet<T> {
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        BTreeSet::iter(self).nth(index).map(|v| v as &dyn Reflect)
    }

    #[inline]
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(BTreeSet::iter(self).map(|v| v as &dyn Reflect))
    }

    /// Duplicates are dropped.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        self.insert(value.take::<T>()?);
        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        BTreeSet::clear(self);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeSet;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::info::{ListKind, TypePath, Typed};
    use crate::ops::List;

    #[test]
    fn list_type_paths() {
        assert_eq!(<Vec<i32>>::type_path(), "alloc::vec::Vec<i32>");
        assert_eq!(<BTreeSet<String>>::type_name(), "BTreeSet<String>");
    }

    #[test]
    fn list_kinds() {
        let kind = <BTreeSet<u8>>::type_info().as_list().unwrap().list_kind();
        assert_eq!(kind, ListKind::Set);
        let kind = <Vec<u8>>::type_info().as_list().unwrap().list_kind();
        assert_eq!(kind, ListKind::Sequence);
    }

    #[test]
    fn push_checks_item_type() {
        let mut list = vec![1_u8];
        let dyn_list: &mut dyn List = &mut list;
        assert!(dyn_list.push(Box::new(2_u8)).is_ok());
        assert!(dyn_list.push(Box::new(String::new())).is_err());
        assert_eq!(dyn_list.len(), 2);
        assert_eq!(list, vec![1, 2]);
    }

    #[test]
    fn sets_drop_duplicates() {
        let mut set: BTreeSet<i32> = BTreeSet::new();
        let dyn_set: &mut dyn List = &mut set;
        dyn_set.push(Box::new(3_i32)).unwrap();
        dyn_set.push(Box::new(3_i32)).unwrap();
        assert_eq!(dyn_set.len(), 1);
        let items: Vec<i32> = dyn_set
            .iter()
            .filter_map(|v| v.downcast_ref::<i32>().copied())
            .collect();
        assert_eq!(items, vec![3]);
    }
}
