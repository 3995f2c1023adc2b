use alloc::boxed::Box;
use alloc::sync::Arc;

use vc_utils::hash::HashMap;

use crate::Reflect;
use crate::info::attributes::impl_custom_attributes_fn;
use crate::info::{CustomAttributes, Type, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// NamedField

/// A named member of a struct.
///
/// Carries the declared name, the optional wire alias
/// (`#[reflect(rename = "...")]`), and the membership markers the
/// serializer consults: `ignore` always excludes, `data_member` opts in
/// when the owning struct is a data contract.
#[derive(Debug, Clone)]
pub struct NamedField {
    name: &'static str,
    alias: Option<&'static str>,
    ty: Type,
    type_info: fn() -> &'static TypeInfo,
    ignore: bool,
    data_member: bool,
    custom_attributes: Arc<CustomAttributes>,
}

impl NamedField {
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            ty: Type::of::<T>(),
            type_info: T::type_info,
            ignore: false,
            data_member: false,
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

    #[inline]
    pub fn with_ignore(self, ignore: bool) -> Self {
        Self { ignore, ..self }
    }

    #[inline]
    pub fn with_data_member(self, data_member: bool) -> Self {
        Self {
            data_member,
            ..self
        }
    }

    impl_custom_attributes_fn!();

    /// The declared member name.
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
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub const fn is_ignored(&self) -> bool {
        self.ignore
    }

    #[inline]
    pub const fn is_data_member(&self) -> bool {
        self.data_member
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// Type info for structs with named members, in declaration order.
///
/// A struct without members yields an empty schema, not an error.
///
/// ```
/// use vc_reflect::{derive::Reflect, info::Typed};
///
/// #[derive(Reflect, Clone, Default)]
/// #[reflect(data_contract)]
/// struct Order {
///     #[reflect(data_member)]
///     id: u32,
///     #[reflect(data_member, rename = "total")]
///     amount: f64,
///     cache: String,
/// }
///
/// let info = Order::type_info().as_struct().unwrap();
/// assert!(info.is_data_contract());
/// assert_eq!(info.field_names(), ["id", "amount", "cache"]);
/// assert_eq!(info.field_at(1).unwrap().wire_name(), "total");
/// assert!(!info.field("cache").unwrap().is_data_member());
/// ```
#[derive(Debug)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
    field_names: Box<[&'static str]>,
    field_indices: HashMap<&'static str, usize>,
    data_contract: bool,
    default_fn: fn() -> Box<dyn Reflect>,
    custom_attributes: Arc<CustomAttributes>,
}

impl StructInfo {
    pub fn new<T: Typed + Reflect + Default>(fields: &[NamedField]) -> Self {
        let field_indices = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name(), index))
            .collect::<HashMap<_, _>>();
        let field_names = fields.iter().map(NamedField::name).collect();

        Self {
            ty: Type::of::<T>(),
            fields: fields.to_vec().into_boxed_slice(),
            field_names,
            field_indices,
            data_contract: false,
            default_fn: || -> Box<dyn Reflect> { Box::new(T::default()) },
            custom_attributes: Arc::new(CustomAttributes::new()),
        }
    }

    /// Marks the struct as opt-in: only `data_member` fields serialize.
    #[inline]
    pub fn with_data_contract(self, data_contract: bool) -> Self {
        Self {
            data_contract,
            ..self
        }
    }

    impl_custom_attributes_fn!();

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn is_data_contract(&self) -> bool {
        self.data_contract
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.field_indices.get(name).map(|&index| &self.fields[index])
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&NamedField> {
        self.fields.get(index)
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.field_indices.get(name).copied()
    }

    #[inline]
    pub fn field_names(&self) -> &[&'static str] {
        &self.field_names
    }

    #[inline]
    pub fn fields(&self) -> &[NamedField] {
        &self.fields
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Creates the `Default` instance.
    #[inline]
    pub fn construct(&self) -> Box<dyn Reflect> {
        (self.default_fn)()
    }
}
