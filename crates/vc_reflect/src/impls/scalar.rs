use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{ReflectKind, ScalarInfo, ScalarKind, TypeInfo, TypePath, Typed};
use crate::ops::{Bytes, ReflectMut, ReflectRef, Scalar, ScalarRef, ScalarValue};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTraitDefault};

macro_rules! impl_reflect_scalar {
    (
        $ty:ty, $kind:ident,
        path = $path:expr, name = $name:expr, ident = $ident:expr, module = $module:expr,
        borrow = |$this:ident| $borrow:expr $(,)?
    ) => {
        impl TypePath for $ty {
            #[inline(always)]
            fn type_path() -> &'static str {
                $path
            }

            #[inline(always)]
            fn type_name() -> &'static str {
                $name
            }

            #[inline(always)]
            fn type_ident() -> &'static str {
                $ident
            }

            #[inline(always)]
            fn module_path() -> Option<&'static str> {
                $module
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    TypeInfo::Scalar(ScalarInfo::new::<Self>(
                        ScalarKind::$kind,
                        || Box::new(<$ty as Default>::default()),
                        |value| match value {
                            ScalarValue::$kind(v) => Ok(Box::new(<$ty>::from(v))),
                            other => Err(other),
                        },
                    ))
                })
            }
        }

        impl Reflect for $ty {
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> ReflectKind {
                ReflectKind::Scalar
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Scalar(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Scalar(self)
            }

            #[inline]
            fn reflect_clone(&self) -> Box<dyn Reflect> {
                Box::new(Clone::clone(self))
            }

            fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
                match other.downcast_ref::<Self>() {
                    Some(other) => Some(PartialEq::eq(self, other)),
                    None => crate::impls::reflect_partial_eq(self.reflect_ref(), other),
                }
            }

            fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }

        impl Scalar for $ty {
            #[inline]
            fn scalar_ref(&self) -> ScalarRef<'_> {
                let $this = self;
                ScalarRef::$kind($borrow)
            }

            fn set_scalar(&mut self, value: ScalarValue) -> Result<(), ScalarValue> {
                match value {
                    ScalarValue::$kind(v) => {
                        *self = <$ty>::from(v);
                        Ok(())
                    }
                    other => Err(other),
                }
            }
        }

        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::with_capacity::<Self>(1);
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta
            }
        }
    };
}

macro_rules! impl_reflect_primitive {
    ($($ty:ident => $kind:ident),* $(,)?) => {
        $(impl_reflect_scalar!(
            $ty, $kind,
            path = stringify!($ty), name = stringify!($ty), ident = stringify!($ty), module = None,
            borrow = |this| *this,
        );)*
    };
}

impl_reflect_primitive! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl_reflect_scalar!(
    String, String,
    path = "alloc::string::String", name = "String", ident = "String",
    module = Some("alloc::string"),
    borrow = |this| this.as_str(),
);

impl_reflect_scalar!(
    Bytes, Bytes,
    path = "vc_reflect::ops::Bytes", name = "Bytes", ident = "Bytes",
    module = Some("vc_reflect::ops"),
    borrow = |this| this.0.as_slice(),
);

impl_reflect_scalar!(
    Uuid, Guid,
    path = "uuid::Uuid", name = "Uuid", ident = "Uuid", module = Some("uuid"),
    borrow = |this| *this,
);

impl_reflect_scalar!(
    DateTime<Utc>, DateTime,
    path = "chrono::DateTime<chrono::Utc>", name = "DateTime<Utc>", ident = "DateTime",
    module = Some("chrono"),
    borrow = |this| *this,
);

impl_reflect_scalar!(
    DateTime<FixedOffset>, DateTimeOffset,
    path = "chrono::DateTime<chrono::FixedOffset>", name = "DateTime<FixedOffset>",
    ident = "DateTime", module = Some("chrono"),
    borrow = |this| *this,
);

impl_reflect_scalar!(
    NaiveDateTime, NaiveDateTime,
    path = "chrono::NaiveDateTime", name = "NaiveDateTime", ident = "NaiveDateTime",
    module = Some("chrono"),
    borrow = |this| *this,
);

impl_reflect_scalar!(
    NaiveDate, NaiveDate,
    path = "chrono::NaiveDate", name = "NaiveDate", ident = "NaiveDate",
    module = Some("chrono"),
    borrow = |this| *this,
);

impl_reflect_scalar!(
    TimeDelta, TimeSpan,
    path = "chrono::TimeDelta", name = "TimeDelta", ident = "TimeDelta",
    module = Some("chrono"),
    borrow = |this| *this,
);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use chrono::{DateTime, TimeDelta, Utc};
    use uuid::Uuid;

    use crate::Reflect;
    use crate::info::{ScalarKind, TypePath, Typed};
    use crate::ops::{Bytes, Scalar, ScalarRef, ScalarValue};

    #[test]
    fn type_paths() {
        assert_eq!(<u64 as TypePath>::type_path(), "u64");
        assert_eq!(String::type_path(), "alloc::string::String");
        assert_eq!(<DateTime<Utc>>::type_name(), "DateTime<Utc>");
        assert_eq!(Uuid::type_path(), "uuid::Uuid");
    }

    #[test]
    fn scalar_kinds() {
        let kind = |info: &crate::info::TypeInfo| info.as_scalar().unwrap().scalar_kind();
        assert_eq!(kind(TimeDelta::type_info()), ScalarKind::TimeSpan);
        assert_eq!(kind(Bytes::type_info()), ScalarKind::Bytes);
        assert_eq!(kind(f32::type_info()), ScalarKind::F32);
    }

    #[test]
    fn bytes_borrow_without_copy() {
        let bytes = Bytes(alloc::vec![1, 2, 3]);
        assert_eq!(bytes.scalar_ref(), ScalarRef::Bytes(&[1, 2, 3]));
    }

    #[test]
    fn set_scalar_checks_kind() {
        let mut id = Uuid::nil();
        let fresh = Uuid::from_u128(7);
        assert!(id.set_scalar(ScalarValue::Guid(fresh)).is_ok());
        assert_eq!(id, fresh);
        assert!(id.set_scalar(ScalarValue::U128(7)).is_err());
    }

    #[test]
    fn set_rejects_other_types() {
        let mut n = 3_i16;
        let rejected = n.set(Box::new(4_i32)).unwrap_err();
        assert_eq!(rejected.downcast_ref::<i32>(), Some(&4));
        assert_eq!(n, 3);
    }
}
