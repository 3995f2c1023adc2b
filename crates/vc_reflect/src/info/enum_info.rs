use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::Reflect;
use crate::info::attributes::impl_custom_attributes_fn;
use crate::info::{CustomAttributes, Type, TypePath};

// -----------------------------------------------------------------------------
// VariantInfo

/// One declared enum member, or one named bit of a flag set.
#[derive(Debug, Clone)]
pub struct VariantInfo {
    name: &'static str,
    alias: Option<&'static str>,
    discriminant: i64,
    custom_attributes: Arc<CustomAttributes>,
}

impl VariantInfo {
    #[inline]
    pub fn new(name: &'static str, discriminant: i64) -> Self {
        Self {
            name,
            alias: None,
            discriminant,
            custom_attributes: Arc::new(CustomAttributes::new()),
        }
    }

    #[inline]
    pub fn with_alias(self, alias: &'static str) -> Self {
        Self {
            alias: Some(alias),
            ..self
        }
    }

    impl_custom_attributes_fn!();

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn alias(&self) -> Option<&'static str> {
        self.alias
    }

    /// The alias if present, otherwise the declared name.
    #[inline]
    pub const fn wire_name(&self) -> &'static str {
        match self.alias {
            Some(alias) => alias,
            None => self.name,
        }
    }

    #[inline]
    pub const fn discriminant(&self) -> i64 {
        self.discriminant
    }
}

// -----------------------------------------------------------------------------
// EnumInfo

/// How an enum is written when no global override applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumRepr {
    /// By member name, or alias when declared.
    #[default]
    Name,
    /// By discriminant, as a decimal number.
    Integer,
    /// By discriminant, read as a character code.
    Char,
}

/// Type info for field-less enums and bit-flag sets.
///
/// ```
/// use vc_reflect::{derive::Reflect, info::{Typed, EnumRepr}};
///
/// #[derive(Reflect, Clone, Copy, PartialEq, Debug)]
/// enum Level {
///     Low = 1,
///     #[reflect(rename = "mid")]
///     Medium = 5,
/// }
///
/// let info = Level::type_info().as_enum().unwrap();
/// assert_eq!(info.repr(), EnumRepr::Name);
/// assert_eq!(info.variant_with_name("mid").unwrap().name(), "Medium");
/// assert_eq!(info.variant_with_discriminant(1).unwrap().name(), "Low");
///
/// let value = info.from_discriminant(5).unwrap();
/// assert_eq!(value.downcast_ref::<Level>(), Some(&Level::Medium));
/// ```
#[derive(Debug)]
pub struct EnumInfo {
    ty: Type,
    variants: Box<[VariantInfo]>,
    repr: EnumRepr,
    flags: bool,
    unsigned: bool,
    from_discriminant_fn: fn(i64) -> Option<Box<dyn Reflect>>,
    default_fn: fn() -> Box<dyn Reflect>,
    custom_attributes: Arc<CustomAttributes>,
}

impl EnumInfo {
    /// `from_discriminant` must return `None` for values that name no
    /// member; flag sets accept any combination of bits.
    pub fn new<T: TypePath>(
        variants: &[VariantInfo],
        from_discriminant: fn(i64) -> Option<Box<dyn Reflect>>,
        default_fn: fn() -> Box<dyn Reflect>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            variants: variants.to_vec().into_boxed_slice(),
            repr: EnumRepr::Name,
            flags: false,
            unsigned: false,
            from_discriminant_fn: from_discriminant,
            default_fn,
            custom_attributes: Arc::new(CustomAttributes::new()),
        }
    }

    #[inline]
    pub fn with_repr(self, repr: EnumRepr) -> Self {
        Self { repr, ..self }
    }

    /// Marks the type as a bit-flag set. `unsigned` selects how the
    /// discriminant is printed.
    #[inline]
    pub fn with_flags(self, unsigned: bool) -> Self {
        Self {
            flags: true,
            unsigned,
            ..self
        }
    }

    impl_custom_attributes_fn!();

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn variants(&self) -> &[VariantInfo] {
        &self.variants
    }

    #[inline]
    pub const fn repr(&self) -> EnumRepr {
        self.repr
    }

    #[inline]
    pub const fn is_flags(&self) -> bool {
        self.flags
    }

    #[inline]
    pub const fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    /// Finds a member by wire alias first, then by declared name.
    pub fn variant_with_name(&self, name: &str) -> Option<&VariantInfo> {
        self.variants
            .iter()
            .find(|v| v.alias == Some(name))
            .or_else(|| self.variants.iter().find(|v| v.name == name))
    }

    /// Case-insensitive form of [`variant_with_name`](Self::variant_with_name).
    pub fn variant_with_name_ignore_case(&self, name: &str) -> Option<&VariantInfo> {
        self.variant_with_name(name).or_else(|| {
            self.variants.iter().find(|v| {
                v.alias.is_some_and(|a| a.eq_ignore_ascii_case(name))
                    || v.name.eq_ignore_ascii_case(name)
            })
        })
    }

    #[inline]
    pub fn variant_with_discriminant(&self, discriminant: i64) -> Option<&VariantInfo> {
        self.variants.iter().find(|v| v.discriminant == discriminant)
    }

    #[inline]
    pub fn from_discriminant(&self, discriminant: i64) -> Option<Box<dyn Reflect>> {
        (self.from_discriminant_fn)(discriminant)
    }

    /// Creates the first declared member, or the empty set for flags.
    #[inline]
    pub fn construct(&self) -> Box<dyn Reflect> {
        (self.default_fn)()
    }
}
