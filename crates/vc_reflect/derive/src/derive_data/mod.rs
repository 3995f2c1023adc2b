// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod reflect_enum;
mod reflect_meta;
mod reflect_struct;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{EnumReprAttr, FieldAttributes, TypeAttributes, VariantAttributes};
pub(crate) use reflect_enum::ReflectEnum;
pub(crate) use reflect_meta::ReflectMeta;
pub(crate) use reflect_struct::ReflectStruct;

use syn::{Data, DeriveInput};

/// Parsed input of `#[derive(Reflect)]`.
pub(crate) enum ReflectDerive<'a> {
    Struct(ReflectStruct<'a>),
    Enum(ReflectEnum<'a>),
}

impl<'a> ReflectDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        if let Some(lifetime) = input.generics.lifetimes().next() {
            return Err(syn::Error::new_spanned(
                lifetime,
                "reflected types must be `'static`, lifetime parameters are not supported",
            ));
        }
        if let Some(param) = input.generics.const_params().next() {
            return Err(syn::Error::new_spanned(
                param,
                "const generics are not supported by `#[derive(Reflect)]`",
            ));
        }

        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let meta = ReflectMeta::new(&input.ident, &input.generics, attrs);

        match &input.data {
            Data::Struct(data) => {
                if meta.attrs().repr != EnumReprAttr::Name {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "`as_int` and `as_char` only apply to enums",
                    ));
                }
                ReflectStruct::new(meta, &data.fields).map(Self::Struct)
            }
            Data::Enum(data) => {
                if meta.attrs().data_contract {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "`data_contract` only applies to structs",
                    ));
                }
                ReflectEnum::new(meta, &data.variants).map(Self::Enum)
            }
            Data::Union(data) => Err(syn::Error::new_spanned(
                data.union_token,
                "unions are not supported by `#[derive(Reflect)]`",
            )),
        }
    }
}
