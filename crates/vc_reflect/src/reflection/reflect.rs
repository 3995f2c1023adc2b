use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::impls;
use crate::info::{DynamicTypePath, DynamicTyped, ReflectKind};
use crate::ops::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// The foundational trait of runtime reflection.
///
/// A `Reflect` value knows its own [`TypeInfo`](crate::info::TypeInfo) and
/// exposes its contents through [`reflect_ref`] / [`reflect_mut`], which
/// return one of the kind-specific views ([`Struct`], [`List`], [`Map`], ...).
///
/// Prefer [`#[derive(Reflect)]`](crate::derive::Reflect) over implementing
/// this trait by hand.
///
/// # Type identification
///
/// [`Any::type_id`] on a `Box<dyn Reflect>` reports the box itself. Use
/// [`Reflect::ty_id`] or the inherent helpers on `dyn Reflect`:
///
/// ```
/// use vc_reflect::Reflect;
///
/// let x: Box<dyn Reflect> = 32_i32.into_boxed_reflect();
///
/// assert!(x.is::<i32>());
/// assert_eq!(x.downcast_ref::<i32>(), Some(&32));
/// ```
///
/// # Manual implementation
///
/// ```rust, ignore
/// fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
///     *self = value.take::<Self>()?;
///     Ok(())
/// }
///
/// fn reflect_kind(&self) -> ReflectKind {
///     ReflectKind::Struct
/// }
///
/// fn reflect_ref(&self) -> ReflectRef<'_> {
///     ReflectRef::Struct(self)
/// }
/// ```
///
/// [`reflect_ref`]: Reflect::reflect_ref
/// [`reflect_mut`]: Reflect::reflect_mut
/// [`Struct`]: crate::ops::Struct
/// [`List`]: crate::ops::List
/// [`Map`]: crate::ops::Map
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Reflect`",
    note = "consider annotating `{Self}` with `#[derive(Reflect)]`"
)]
pub trait Reflect: DynamicTypePath + DynamicTyped + Send + Sync + Any {
    /// Casts this value to `&dyn Reflect`.
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this value to `&mut dyn Reflect`.
    #[inline(always)]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Boxes this value as `Box<dyn Reflect>`.
    ///
    /// ```
    /// use vc_reflect::Reflect;
    ///
    /// let r = String::from("text").into_boxed_reflect();
    /// assert!(r.is::<String>());
    /// ```
    #[inline(always)]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Returns the [`TypeId`] of the underlying type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Replaces `self` with `value` if both have the same type.
    ///
    /// On mismatch the untouched `value` is handed back.
    ///
    /// ```
    /// use vc_reflect::Reflect;
    ///
    /// let mut n = 1_u8;
    /// assert!(n.set(5_u8.into_boxed_reflect()).is_ok());
    /// assert!(n.set(5_i64.into_boxed_reflect()).is_err());
    /// assert_eq!(n, 5);
    /// ```
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Returns the [`ReflectKind`] of this value.
    fn reflect_kind(&self) -> ReflectKind;

    /// Returns an immutable kind-specific view.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns a mutable kind-specific view.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Clones this value into a new box of the same concrete type.
    fn reflect_clone(&self) -> Box<dyn Reflect>;

    /// Compares two reflected values structurally.
    ///
    /// Returns `None` when the comparison is not defined, which is the case
    /// for opaque values that do not override this method.
    #[inline]
    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        impls::reflect_partial_eq(self.reflect_ref(), other)
    }

    /// Debug formatter used by `impl Debug for dyn Reflect`.
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        impls::reflect_debug(self.reflect_ref(), self.reflect_type_path(), f)
    }
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to `&T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to `&mut T`.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts a boxed value to `Box<T>`, returning the box untouched on mismatch.
    ///
    /// ```
    /// use vc_reflect::Reflect;
    ///
    /// let x = 7_u16.into_boxed_reflect();
    /// let x = x.downcast::<u8>().unwrap_err();
    /// assert_eq!(*x.downcast::<u16>().unwrap(), 7);
    /// ```
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self;
        match any.downcast::<T>() {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("type is already checked"),
        }
    }

    /// Downcasts a boxed value and moves it out of the box.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Reflect {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reflect_debug(f)
    }
}
