use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use vc_utils::TypeIdMap;

use crate::Reflect;

/// Arbitrary reflected values attached to a type, field or variant.
///
/// Attributes are keyed by their own type, so at most one value of each
/// type is stored. The derive macro fills this from `#[reflect(@expr)]`.
///
/// ```
/// use vc_reflect::{derive::Reflect, info::{Typed, CustomAttributes}};
///
/// #[derive(Reflect, Clone, Default)]
/// struct Marker;
///
/// #[derive(Reflect, Clone, Default)]
/// #[reflect(@Marker)]
/// struct Tagged {
///     id: i32,
/// }
///
/// let info = Tagged::type_info();
/// assert!(info.custom_attributes().contains::<Marker>());
/// ```
#[derive(Default)]
pub struct CustomAttributes {
    attributes: TypeIdMap<Box<dyn Reflect>>,
}

static EMPTY: CustomAttributes = CustomAttributes::new();

impl CustomAttributes {
    #[inline]
    pub const fn new() -> Self {
        Self {
            attributes: TypeIdMap::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            attributes: TypeIdMap::with_capacity(capacity),
        }
    }

    /// Shared empty instance.
    #[inline(always)]
    pub fn empty() -> &'static Self {
        &EMPTY
    }

    /// Adds an attribute, replacing one of the same type.
    #[inline]
    pub fn with_attribute<T: Reflect>(mut self, value: T) -> Self {
        self.attributes.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    #[inline]
    pub fn contains<T: Reflect>(&self) -> bool {
        self.attributes.contains_type::<T>()
    }

    #[inline]
    pub fn get<T: Reflect>(&self) -> Option<&T> {
        self.attributes.get_type::<T>()?.downcast_ref::<T>()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterates attribute values in arbitrary order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn Reflect> {
        self.attributes.values().map(|value| &**value)
    }
}

impl fmt::Debug for CustomAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Generates `custom_attributes` / `with_custom_attributes` on an info type
/// holding an `Arc<CustomAttributes>` field of the same name.
macro_rules! impl_custom_attributes_fn {
    () => {
        /// Returns the attached [`CustomAttributes`](crate::info::CustomAttributes).
        #[inline]
        pub fn custom_attributes(&self) -> &crate::info::CustomAttributes {
            &self.custom_attributes
        }

        /// Replaces the attached [`CustomAttributes`](crate::info::CustomAttributes).
        #[inline]
        pub fn with_custom_attributes(self, attributes: crate::info::CustomAttributes) -> Self {
            Self {
                custom_attributes: alloc::sync::Arc::new(attributes),
                ..self
            }
        }
    };
}

pub(crate) use impl_custom_attributes_fn;
