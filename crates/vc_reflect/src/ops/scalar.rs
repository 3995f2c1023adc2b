use alloc::string::String;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::Reflect;
use crate::info::ScalarKind;

// -----------------------------------------------------------------------------
// Bytes

/// A byte array written as base64 text.
///
/// `Vec<u8>` reflects as a list of numbers; wrap it in `Bytes` to get the
/// binary-safe scalar form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes(pub Vec<u8>);

impl Deref for Bytes {
    type Target = Vec<u8>;

    #[inline]
    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl DerefMut for Bytes {
    #[inline]
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.0
    }
}

impl From<Vec<u8>> for Bytes {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

// -----------------------------------------------------------------------------
// ScalarValue / ScalarRef

macro_rules! define_scalars {
    ($lt:lifetime; $($kind:ident($owned:ty, $borrowed:ty)),* $(,)?) => {
        /// An owned leaf value, tagged with its [`ScalarKind`].
        #[derive(Debug, Clone, PartialEq)]
        pub enum ScalarValue {
            $($kind($owned),)*
        }

        /// A borrowed leaf value; text and bytes are not copied.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum ScalarRef<$lt> {
            $($kind($borrowed),)*
        }

        impl ScalarValue {
            pub const fn kind(&self) -> ScalarKind {
                match self {
                    $(Self::$kind(_) => ScalarKind::$kind,)*
                }
            }
        }

        impl ScalarRef<'_> {
            pub const fn kind(&self) -> ScalarKind {
                match self {
                    $(Self::$kind(_) => ScalarKind::$kind,)*
                }
            }
        }
    };
}

define_scalars! {
    'a;
    Bool(bool, bool),
    Char(char, char),
    I8(i8, i8),
    I16(i16, i16),
    I32(i32, i32),
    I64(i64, i64),
    I128(i128, i128),
    Isize(isize, isize),
    U8(u8, u8),
    U16(u16, u16),
    U32(u32, u32),
    U64(u64, u64),
    U128(u128, u128),
    Usize(usize, usize),
    F32(f32, f32),
    F64(f64, f64),
    String(String, &'a str),
    DateTime(DateTime<Utc>, DateTime<Utc>),
    DateTimeOffset(DateTime<FixedOffset>, DateTime<FixedOffset>),
    NaiveDateTime(NaiveDateTime, NaiveDateTime),
    NaiveDate(NaiveDate, NaiveDate),
    TimeSpan(TimeDelta, TimeDelta),
    Guid(Uuid, Uuid),
    Bytes(Vec<u8>, &'a [u8]),
}

impl ScalarValue {
    /// Borrows this value.
    pub fn as_ref(&self) -> ScalarRef<'_> {
        match self {
            Self::Bool(v) => ScalarRef::Bool(*v),
            Self::Char(v) => ScalarRef::Char(*v),
            Self::I8(v) => ScalarRef::I8(*v),
            Self::I16(v) => ScalarRef::I16(*v),
            Self::I32(v) => ScalarRef::I32(*v),
            Self::I64(v) => ScalarRef::I64(*v),
            Self::I128(v) => ScalarRef::I128(*v),
            Self::Isize(v) => ScalarRef::Isize(*v),
            Self::U8(v) => ScalarRef::U8(*v),
            Self::U16(v) => ScalarRef::U16(*v),
            Self::U32(v) => ScalarRef::U32(*v),
            Self::U64(v) => ScalarRef::U64(*v),
            Self::U128(v) => ScalarRef::U128(*v),
            Self::Usize(v) => ScalarRef::Usize(*v),
            Self::F32(v) => ScalarRef::F32(*v),
            Self::F64(v) => ScalarRef::F64(*v),
            Self::String(v) => ScalarRef::String(v),
            Self::DateTime(v) => ScalarRef::DateTime(*v),
            Self::DateTimeOffset(v) => ScalarRef::DateTimeOffset(*v),
            Self::NaiveDateTime(v) => ScalarRef::NaiveDateTime(*v),
            Self::NaiveDate(v) => ScalarRef::NaiveDate(*v),
            Self::TimeSpan(v) => ScalarRef::TimeSpan(*v),
            Self::Guid(v) => ScalarRef::Guid(*v),
            Self::Bytes(v) => ScalarRef::Bytes(v),
        }
    }
}

impl ScalarRef<'_> {
    /// Copies this value into an owned [`ScalarValue`].
    pub fn to_owned(&self) -> ScalarValue {
        match *self {
            Self::Bool(v) => ScalarValue::Bool(v),
            Self::Char(v) => ScalarValue::Char(v),
            Self::I8(v) => ScalarValue::I8(v),
            Self::I16(v) => ScalarValue::I16(v),
            Self::I32(v) => ScalarValue::I32(v),
            Self::I64(v) => ScalarValue::I64(v),
            Self::I128(v) => ScalarValue::I128(v),
            Self::Isize(v) => ScalarValue::Isize(v),
            Self::U8(v) => ScalarValue::U8(v),
            Self::U16(v) => ScalarValue::U16(v),
            Self::U32(v) => ScalarValue::U32(v),
            Self::U64(v) => ScalarValue::U64(v),
            Self::U128(v) => ScalarValue::U128(v),
            Self::Usize(v) => ScalarValue::Usize(v),
            Self::F32(v) => ScalarValue::F32(v),
            Self::F64(v) => ScalarValue::F64(v),
            Self::String(v) => ScalarValue::String(v.into()),
            Self::DateTime(v) => ScalarValue::DateTime(v),
            Self::DateTimeOffset(v) => ScalarValue::DateTimeOffset(v),
            Self::NaiveDateTime(v) => ScalarValue::NaiveDateTime(v),
            Self::NaiveDate(v) => ScalarValue::NaiveDate(v),
            Self::TimeSpan(v) => ScalarValue::TimeSpan(v),
            Self::Guid(v) => ScalarValue::Guid(v),
            Self::Bytes(v) => ScalarValue::Bytes(v.to_vec()),
        }
    }
}

// -----------------------------------------------------------------------------
// Scalar

/// Access to leaf values.
///
/// ```
/// use vc_reflect::ops::{Scalar, ScalarRef, ScalarValue};
///
/// let mut text = String::from("a");
/// assert_eq!(text.scalar_ref(), ScalarRef::String("a"));
///
/// assert!(text.set_scalar(ScalarValue::String("b".into())).is_ok());
/// assert!(text.set_scalar(ScalarValue::Bool(true)).is_err());
/// assert_eq!(text, "b");
/// ```
pub trait Scalar: Reflect {
    fn scalar_ref(&self) -> ScalarRef<'_>;

    /// Assigns a value of exactly this scalar's kind; others are handed back.
    fn set_scalar(&mut self, value: ScalarValue) -> Result<(), ScalarValue>;
}
