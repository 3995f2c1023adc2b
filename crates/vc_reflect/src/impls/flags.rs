/// Integer types usable as `bitflags` storage.
///
/// Discriminants travel as `i64`; unsigned 64-bit sets wrap and are
/// printed back through [`UNSIGNED`](FlagBits::UNSIGNED).
pub trait FlagBits: Copy {
    const UNSIGNED: bool;

    fn to_i64(self) -> i64;

    fn from_i64(value: i64) -> Self;
}

macro_rules! impl_flag_bits {
    ($unsigned:literal: $($ty:ty),*) => {
        $(impl FlagBits for $ty {
            const UNSIGNED: bool = $unsigned;

            #[inline]
            fn to_i64(self) -> i64 {
                self as i64
            }

            #[inline]
            fn from_i64(value: i64) -> Self {
                value as $ty
            }
        })*
    };
}

impl_flag_bits!(true: u8, u16, u32, u64);
impl_flag_bits!(false: i8, i16, i32, i64);

/// Reflects a `bitflags` type as a flags enum.
///
/// The type must derive `Clone`. Named flags become the enum's members;
/// any combination of bits is a valid value.
///
/// ```
/// use vc_reflect::{impl_reflect_flags, info::Typed, ops::Enum};
///
/// bitflags::bitflags! {
///     #[derive(Clone, Copy, Debug, PartialEq)]
///     pub struct Access: u8 {
///         const READ = 1;
///         const WRITE = 2;
///     }
/// }
///
/// impl_reflect_flags!(Access);
///
/// let info = Access::type_info().as_enum().unwrap();
/// assert!(info.is_flags());
/// assert_eq!(info.variant_with_name("WRITE").unwrap().discriminant(), 2);
///
/// let mut access = Access::READ;
/// assert!(access.set_discriminant(3));
/// assert_eq!(access, Access::READ | Access::WRITE);
/// ```
#[macro_export]
macro_rules! impl_reflect_flags {
    ($ty:ident) => {
        $crate::impl_reflect_flags!($ty, type_path = concat!(module_path!(), "::", stringify!($ty)));
    };
    ($ty:ident, type_path = $path:expr) => {
        impl $crate::info::TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some(module_path!())
            }
        }

        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                use $crate::__macro_exports::bitflags::Flags as _;
                use $crate::impls::FlagBits as _;

                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    let variants: $crate::__macro_exports::Vec<$crate::info::VariantInfo> =
                        <$ty>::FLAGS
                            .iter()
                            .filter(|flag| !flag.name().is_empty())
                            .map(|flag| {
                                $crate::info::VariantInfo::new(flag.name(), flag.value().bits().to_i64())
                            })
                            .collect();
                    $crate::info::TypeInfo::Enum(
                        $crate::info::EnumInfo::new::<Self>(
                            &variants,
                            |discriminant| {
                                let bits = $crate::impls::FlagBits::from_i64(discriminant);
                                $crate::__macro_exports::Option::Some(
                                    $crate::__macro_exports::Box::new(<$ty>::from_bits_retain(bits)),
                                )
                            },
                            || $crate::__macro_exports::Box::new(<$ty>::empty()),
                        )
                        .with_flags(
                            <<$ty as $crate::__macro_exports::bitflags::Flags>::Bits as $crate::impls::FlagBits>::UNSIGNED,
                        )
                        .with_repr($crate::info::EnumRepr::Integer),
                    )
                })
            }
        }

        impl $crate::Reflect for $ty {
            fn set(
                &mut self,
                value: $crate::__macro_exports::Box<dyn $crate::Reflect>,
            ) -> Result<(), $crate::__macro_exports::Box<dyn $crate::Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> $crate::info::ReflectKind {
                $crate::info::ReflectKind::Enum
            }

            #[inline]
            fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
                $crate::ops::ReflectRef::Enum(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
                $crate::ops::ReflectMut::Enum(self)
            }

            #[inline]
            fn reflect_clone(&self) -> $crate::__macro_exports::Box<dyn $crate::Reflect> {
                $crate::__macro_exports::Box::new(Clone::clone(self))
            }
        }

        impl $crate::ops::Enum for $ty {
            #[inline]
            fn discriminant(&self) -> i64 {
                $crate::impls::FlagBits::to_i64(
                    <$ty as $crate::__macro_exports::bitflags::Flags>::bits(self),
                )
            }

            fn set_discriminant(&mut self, discriminant: i64) -> bool {
                *self = <$ty as $crate::__macro_exports::bitflags::Flags>::from_bits_retain(
                    $crate::impls::FlagBits::from_i64(discriminant),
                );
                true
            }
        }

        impl $crate::registry::GetTypeMeta for $ty {
            #[inline]
            fn get_type_meta() -> $crate::registry::TypeMeta {
                $crate::registry::TypeMeta::of::<Self>()
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{EnumRepr, Typed};
    use crate::ops::Enum;

    bitflags::bitflags! {
        #[derive(Clone, Copy, Debug, PartialEq)]
        struct Mode: u32 {
            const A = 1;
            const B = 2;
            const C = 4;
        }
    }

    crate::impl_reflect_flags!(Mode);

    #[test]
    fn flags_info() {
        let info = Mode::type_info().as_enum().unwrap();
        assert!(info.is_flags());
        assert!(info.is_unsigned());
        assert_eq!(info.repr(), EnumRepr::Integer);
        assert_eq!(info.variants().len(), 3);
    }

    #[test]
    fn combined_bits_round_trip_through_discriminant() {
        let value = Mode::A | Mode::C;
        assert_eq!(value.discriminant(), 5);

        let info = Mode::type_info().as_enum().unwrap();
        let rebuilt = info.from_discriminant(5).unwrap();
        assert_eq!(rebuilt.downcast_ref::<Mode>(), Some(&value));
        assert_eq!(value.reflect_partial_eq(&Mode::A), Some(false));
    }

    #[test]
    fn default_is_empty() {
        let info = Mode::type_info().as_enum().unwrap();
        let value = info.construct();
        assert_eq!(value.downcast_ref::<Mode>(), Some(&Mode::empty()));
    }
}
