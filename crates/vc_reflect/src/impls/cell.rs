//! Static storage for lazily built type metadata.
//!
//! - [`NonGenericTypeInfoCell`]: one [`TypeInfo`] per `static`, backed by a
//!   [`OnceLock`].
//! - [`GenericTypeInfoCell`] / [`GenericTypePathCell`]: a `static` inside a
//!   generic function is shared by every instantiation, so these key their
//!   entries by [`TypeId`].
//!
//! Entries are leaked on first use and live for the rest of the process.

use alloc::{boxed::Box, string::String};
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use vc_utils::TypeIdMap;

use crate::info::TypeInfo;

mod sealed {
    use super::TypeInfo;
    use alloc::string::String;

    pub trait TypedProperty: 'static {
        fn on_built(&self) {}
    }

    impl TypedProperty for String {}

    impl TypedProperty for TypeInfo {
        fn on_built(&self) {
            log::debug!("built type info for `{}`", self.type_path());
        }
    }
}

use sealed::TypedProperty;

/// Storage for a non-generic type's metadata.
pub struct NonGenericTypeCell<T: TypedProperty>(OnceLock<T>);

/// Storage for the [`TypeInfo`] of a non-generic type.
///
/// ```
/// use vc_reflect::impls::NonGenericTypeInfoCell;
/// use vc_reflect::info::{TypeInfo, OpaqueInfo, TypePath, Typed};
///
/// struct Handle;
///
/// impl TypePath for Handle {
///     fn type_path() -> &'static str { "app::Handle" }
///     fn type_name() -> &'static str { "Handle" }
///     fn type_ident() -> &'static str { "Handle" }
/// }
///
/// impl Typed for Handle {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert_eq!(Handle::type_info().type_path(), "app::Handle");
/// ```
pub type NonGenericTypeInfoCell = NonGenericTypeCell<TypeInfo>;

impl<T: TypedProperty> NonGenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored value, building it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.0.get_or_init(|| {
            let value = f();
            value.on_built();
            value
        })
    }
}

/// Storage for metadata of a generic type, one entry per instantiation.
pub struct GenericTypeCell<T: TypedProperty>(RwLock<TypeIdMap<&'static T>>);

/// Storage for the [`TypeInfo`] of a generic type.
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

/// Storage for the type path or name of a generic type.
///
/// ```
/// use vc_reflect::impls::{self, GenericTypePathCell};
/// use vc_reflect::info::TypePath;
///
/// struct Page<T>(Vec<T>);
///
/// impl<T: TypePath> TypePath for Page<T> {
///     fn type_path() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| impls::concat(&["app::Page<", T::type_path(), ">"]))
///     }
///     fn type_name() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| impls::concat(&["Page<", T::type_name(), ">"]))
///     }
///     fn type_ident() -> &'static str {
///         "Page"
///     }
/// }
///
/// assert_eq!(<Page<i32>>::type_path(), "app::Page<i32>");
/// assert_eq!(<Page<u8>>::type_name(), "Page<u8>");
/// ```
pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: TypedProperty> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the entry for `G`, building it with `f` on first access.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &T {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &T {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &T {
        let mut table = self.0.write().unwrap_or_else(PoisonError::into_inner);
        let info: &'static T = *table.get_or_insert(type_id, || {
            value.on_built();
            Box::leak(Box::new(value))
        });
        info
    }
}
