use alloc::boxed::Box;
use core::any::TypeId;
use core::{error, fmt};

use crate::Reflect;
use crate::info::{CustomAttributes, Type};
use crate::info::{EnumInfo, ListInfo, MapInfo, ObjectInfo};
use crate::info::{OpaqueInfo, OptionInfo, ScalarInfo, StructInfo};

// -----------------------------------------------------------------------------
// ReflectKind

/// The closed set of shapes a reflected type can take.
///
/// The serializers dispatch on this kind and never on concrete types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    /// Leaf values: numbers, text, dates, GUIDs, byte arrays.
    Scalar,
    /// Field-less enums and bit-flag sets.
    Enum,
    /// `Option<T>`.
    Option,
    /// Ordered sequences and sets.
    List,
    /// Key/value collections.
    Map,
    /// Types with named members.
    Struct,
    /// A polymorphic slot holding any reflected value.
    Object,
    /// Values with no reflected structure.
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.pad("Scalar"),
            Self::Enum => f.pad("Enum"),
            Self::Option => f.pad("Option"),
            Self::List => f.pad("List"),
            Self::Map => f.pad("Map"),
            Self::Struct => f.pad("Struct"),
            Self::Object => f.pad("Object"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

/// Error returned when a `TypeInfo` value is not the expected `ReflectKind`.
#[derive(Debug)]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

impl fmt::Display for ReflectKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reflect kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for ReflectKindError {}

// -----------------------------------------------------------------------------
// TypeInfo

/// The schema of a reflected type.
///
/// Built once per type on first use and kept for the life of the process.
/// Naming conventions are *not* applied here: the same schema serves every
/// configuration, and the serializer maps member names at write time.
///
/// ```
/// use vc_reflect::info::{Typed, ReflectKind};
///
/// let info = <Vec<Option<u8>>>::type_info();
/// assert_eq!(info.kind(), ReflectKind::List);
///
/// let item = info.as_list().unwrap().item_info();
/// assert_eq!(item.kind(), ReflectKind::Option);
/// ```
#[derive(Debug)]
pub enum TypeInfo {
    Scalar(ScalarInfo),
    Enum(EnumInfo),
    Option(OptionInfo),
    List(ListInfo),
    Map(MapInfo),
    Struct(StructInfo),
    Object(ObjectInfo),
    Opaque(OpaqueInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Converts to the kind-specific info, or reports the actual kind.
        pub const fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_scalar: Scalar => ScalarInfo);
    impl_cast_method!(as_enum: Enum => EnumInfo);
    impl_cast_method!(as_option: Option => OptionInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_struct: Struct => StructInfo);
    impl_cast_method!(as_object: Object => ObjectInfo);
    impl_cast_method!(as_opaque: Opaque => OpaqueInfo);

    pub const fn kind(&self) -> ReflectKind {
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

    pub const fn ty(&self) -> &Type {
        match self {
            Self::Scalar(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::Option(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Struct(info) => info.ty(),
            Self::Object(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.ty().is::<T>()
    }

    /// Attributes attached to the type; empty for kinds that carry none.
    pub fn custom_attributes(&self) -> &CustomAttributes {
        match self {
            Self::Struct(info) => info.custom_attributes(),
            Self::Enum(info) => info.custom_attributes(),
            _ => CustomAttributes::empty(),
        }
    }

    /// Creates the default instance of this type.
    ///
    /// Returns `None` for kinds without a natural default, such as
    /// [`Object`](crate::ops::Object) slots.
    pub fn construct(&self) -> Option<Box<dyn Reflect>> {
        match self {
            Self::Scalar(info) => Some(info.construct()),
            Self::Enum(info) => Some(info.construct()),
            Self::Option(info) => Some(info.construct()),
            Self::List(info) => Some(info.construct()),
            Self::Map(info) => Some(info.construct()),
            Self::Struct(info) => Some(info.construct()),
            Self::Object(_) => None,
            Self::Opaque(info) => info.construct(),
        }
    }
}
