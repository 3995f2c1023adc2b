use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed};

/// Type info for `Option<T>`.
#[derive(Debug)]
pub struct OptionInfo {
    ty: Type,
    item_ty: Type,
    item_info: fn() -> &'static TypeInfo,
    none_fn: fn() -> Box<dyn Reflect>,
}

impl OptionInfo {
    pub fn new<T: Typed, Item: Typed>(none_fn: fn() -> Box<dyn Reflect>) -> Self {
        Self {
            ty: Type::of::<T>(),
            item_ty: Type::of::<Item>(),
            item_info: Item::type_info,
            none_fn,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn item_ty(&self) -> &Type {
        &self.item_ty
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item_info)()
    }

    /// Creates `None`.
    #[inline]
    pub fn construct(&self) -> Box<dyn Reflect> {
        (self.none_fn)()
    }
}
