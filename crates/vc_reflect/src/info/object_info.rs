use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{Type, TypePath};

/// Type info for [`Object`](crate::ops::Object), the polymorphic slot.
///
/// The declared type says nothing about the runtime value, so
/// deserializers resolve the concrete type from a type hint.
#[derive(Debug)]
pub struct ObjectInfo {
    ty: Type,
}

impl ObjectInfo {
    #[inline]
    pub fn new<T: TypePath>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}

/// Type info for values without reflected structure.
#[derive(Debug)]
pub struct OpaqueInfo {
    ty: Type,
    default_fn: Option<fn() -> Box<dyn Reflect>>,
}

impl OpaqueInfo {
    #[inline]
    pub fn new<T: TypePath>() -> Self {
        Self {
            ty: Type::of::<T>(),
            default_fn: None,
        }
    }

    #[inline]
    pub fn with_default(self, default_fn: fn() -> Box<dyn Reflect>) -> Self {
        Self {
            default_fn: Some(default_fn),
            ..self
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn construct(&self) -> Option<Box<dyn Reflect>> {
        self.default_fn.map(|f| f())
    }
}
