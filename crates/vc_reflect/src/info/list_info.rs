use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed};

/// Whether a list keeps duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `Vec`, `VecDeque` and similar.
    Sequence,
    /// `HashSet`, `BTreeSet`: pushing a duplicate is a no-op.
    Set,
}

/// Type info for sequences and sets.
#[derive(Debug)]
pub struct ListInfo {
    ty: Type,
    list_kind: ListKind,
    item_ty: Type,
    item_info: fn() -> &'static TypeInfo,
    default_fn: fn() -> Box<dyn Reflect>,
}

impl ListInfo {
    pub fn new<T: Typed, Item: Typed>(
        list_kind: ListKind,
        default_fn: fn() -> Box<dyn Reflect>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            list_kind,
            item_ty: Type::of::<Item>(),
            item_info: Item::type_info,
            default_fn,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn list_kind(&self) -> ListKind {
        self.list_kind
    }

    #[inline]
    pub const fn item_ty(&self) -> &Type {
        &self.item_ty
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item_info)()
    }

    /// Creates an empty collection.
    #[inline]
    pub fn construct(&self) -> Box<dyn Reflect> {
        (self.default_fn)()
    }
}
