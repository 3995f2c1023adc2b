use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{ObjectInfo, ReflectKind, TypeInfo, TypePath, Typed};
use crate::ops::{ReflectMut, ReflectRef};
use crate::registry::{GetTypeMeta, TypeMeta};

/// A member slot declared as "any reflected value".
///
/// The declared type carries no schema, so serializers emit a type hint
/// for the runtime value, and deserializers resolve that hint before
/// constructing anything. Use `Option<Object>` for a nullable slot.
///
/// ```
/// use vc_reflect::ops::Object;
///
/// let slot = Object::new(42_i64);
/// assert_eq!(slot.downcast_ref::<i64>(), Some(&42));
///
/// let nested = Object::from_boxed(Box::new(Object::new(1_u8)));
/// assert!(nested.value().is::<u8>());
/// ```
pub struct Object(Box<dyn Reflect>);

impl Object {
    #[inline]
    pub fn new<T: Reflect>(value: T) -> Self {
        Self::from_boxed(Box::new(value))
    }

    /// Wraps a boxed value; a boxed `Object` is unwrapped instead of nested.
    pub fn from_boxed(value: Box<dyn Reflect>) -> Self {
        match value.take::<Object>() {
            Ok(object) => object,
            Err(value) => Self(value),
        }
    }

    /// The held value.
    #[inline]
    pub fn value(&self) -> &dyn Reflect {
        &*self.0
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut dyn Reflect {
        &mut *self.0
    }

    #[inline]
    pub fn into_inner(self) -> Box<dyn Reflect> {
        self.0
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.downcast_mut::<T>()
    }
}

impl Clone for Object {
    #[inline]
    fn clone(&self) -> Self {
        Self::from_boxed(self.0.reflect_clone())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Object").field(&self.0).finish()
    }
}

impl TypePath for Object {
    #[inline]
    fn type_path() -> &'static str {
        "vc_reflect::ops::Object"
    }

    #[inline]
    fn type_name() -> &'static str {
        "Object"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Object"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("vc_reflect::ops")
    }
}

impl Typed for Object {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Object(ObjectInfo::new::<Self>()))
    }
}

impl Reflect for Object {
    /// Accepts a value of any type.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = Self::from_boxed(value);
        Ok(())
    }

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Object
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Object(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Object(self)
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        match other.downcast_ref::<Object>() {
            Some(other) => self.0.reflect_partial_eq(other.value()),
            None => self.0.reflect_partial_eq(other),
        }
    }
}

impl GetTypeMeta for Object {
    #[inline]
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }
}
