use crate::Reflect;
use crate::info::ReflectKind;
use crate::ops::{Enum, List, Map, Nullable, Object, Scalar, Struct};

macro_rules! impl_reflect_kind_fn {
    () => {
        /// Returns the [`ReflectKind`] of the viewed value.
        pub fn kind(&self) -> ReflectKind {
            match self {
                Self::Scalar(_) => ReflectKind::Scalar,
                Self::Enum(_) => ReflectKind::Enum,
                Self::Option(_) => ReflectKind::Option,
                Self::List(_) => ReflectKind::List,
                Self::Map(_) => ReflectKind::Map,
                Self::Struct(_) => ReflectKind::Struct,
                Self::Object(_) => ReflectKind::Object,
                Self::Opaque(_) => ReflectKind::Opaque,
            }
        }
    };
}

/// An immutable, kind-specific view of a reflected value.
pub enum ReflectRef<'a> {
    Scalar(&'a dyn Scalar),
    Enum(&'a dyn Enum),
    Option(&'a dyn Nullable),
    List(&'a dyn List),
    Map(&'a dyn Map),
    Struct(&'a dyn Struct),
    Object(&'a Object),
    Opaque(&'a dyn Reflect),
}

impl ReflectRef<'_> {
    impl_reflect_kind_fn!();
}

/// A mutable, kind-specific view of a reflected value.
pub enum ReflectMut<'a> {
    Scalar(&'a mut dyn Scalar),
    Enum(&'a mut dyn Enum),
    Option(&'a mut dyn Nullable),
    List(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Struct(&'a mut dyn Struct),
    Object(&'a mut Object),
    Opaque(&'a mut dyn Reflect),
}

impl ReflectMut<'_> {
    impl_reflect_kind_fn!();
}
