use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed};

/// Type info for key/value collections.
#[derive(Debug)]
pub struct MapInfo {
    ty: Type,
    key_ty: Type,
    key_info: fn() -> &'static TypeInfo,
    value_ty: Type,
    value_info: fn() -> &'static TypeInfo,
    default_fn: fn() -> Box<dyn Reflect>,
}

impl MapInfo {
    pub fn new<T: Typed, K: Typed, V: Typed>(default_fn: fn() -> Box<dyn Reflect>) -> Self {
        Self {
            ty: Type::of::<T>(),
            key_ty: Type::of::<K>(),
            key_info: K::type_info,
            value_ty: Type::of::<V>(),
            value_info: V::type_info,
            default_fn,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn key_ty(&self) -> &Type {
        &self.key_ty
    }

    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key_info)()
    }

    #[inline]
    pub const fn value_ty(&self) -> &Type {
        &self.value_ty
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value_info)()
    }

    /// Creates an empty map.
    #[inline]
    pub fn construct(&self) -> Box<dyn Reflect> {
        (self.default_fn)()
    }
}
