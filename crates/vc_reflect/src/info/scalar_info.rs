use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;
use crate::info::{Type, TypePath};
use crate::ops::ScalarValue;

// -----------------------------------------------------------------------------
// ScalarKind

/// The leaf value families understood by the value converters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    String,
    /// `chrono::DateTime<Utc>`.
    DateTime,
    /// `chrono::DateTime<FixedOffset>`.
    DateTimeOffset,
    /// `chrono::NaiveDateTime`, a date and time without zone.
    NaiveDateTime,
    /// `chrono::NaiveDate`.
    NaiveDate,
    /// `chrono::TimeDelta`.
    TimeSpan,
    /// `uuid::Uuid`.
    Guid,
    /// [`Bytes`](crate::ops::Bytes).
    Bytes,
}

impl ScalarKind {
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::I128
                | Self::Isize
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::U128
                | Self::Usize
        )
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Dates, date-times and durations.
    #[inline]
    pub const fn is_temporal(self) -> bool {
        matches!(
            self,
            Self::DateTime
                | Self::DateTimeOffset
                | Self::NaiveDateTime
                | Self::NaiveDate
                | Self::TimeSpan
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// -----------------------------------------------------------------------------
// ScalarInfo

/// Type info for leaf values.
///
/// ```
/// use vc_reflect::info::{Typed, ScalarKind};
/// use vc_reflect::ops::ScalarValue;
///
/// let info = u16::type_info().as_scalar().unwrap();
/// assert_eq!(info.scalar_kind(), ScalarKind::U16);
///
/// let value = info.from_scalar(ScalarValue::U16(9)).unwrap();
/// assert_eq!(value.downcast_ref::<u16>(), Some(&9));
/// assert!(info.from_scalar(ScalarValue::I32(9)).is_err());
/// ```
#[derive(Debug)]
pub struct ScalarInfo {
    ty: Type,
    kind: ScalarKind,
    default_fn: fn() -> Box<dyn Reflect>,
    from_scalar_fn: fn(ScalarValue) -> Result<Box<dyn Reflect>, ScalarValue>,
}

impl ScalarInfo {
    /// `from_scalar` must accept exactly the [`ScalarValue`] variant of `kind`.
    pub fn new<T: TypePath>(
        kind: ScalarKind,
        default_fn: fn() -> Box<dyn Reflect>,
        from_scalar: fn(ScalarValue) -> Result<Box<dyn Reflect>, ScalarValue>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
            default_fn,
            from_scalar_fn: from_scalar,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn scalar_kind(&self) -> ScalarKind {
        self.kind
    }

    #[inline]
    pub fn construct(&self) -> Box<dyn Reflect> {
        (self.default_fn)()
    }

    /// Builds a value from a scalar of exactly this kind.
    ///
    /// Conversions between kinds are the caller's business; a mismatching
    /// value is returned untouched.
    #[inline]
    pub fn from_scalar(&self, value: ScalarValue) -> Result<Box<dyn Reflect>, ScalarValue> {
        (self.from_scalar_fn)(value)
    }
}
