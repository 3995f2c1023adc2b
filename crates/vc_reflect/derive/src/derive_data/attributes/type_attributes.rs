use proc_macro2::Span;
use syn::{Attribute, Ident, LitStr, Token};

use super::{CustomAttributes, parse_reflect_attrs};

/// How enums are written by default.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnumReprAttr {
    #[default]
    Name,
    Integer,
    Char,
}

/// Type-level attributes.
///
/// - `type_path = "..."`: full path override.
/// - `auto_register`: collect into `TypeRegistry::auto_register`.
/// - `data_contract`: only `data_member` fields serialize.
/// - `as_int` / `as_char`: default enum representation.
/// - `@expr`: custom attribute.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub type_path: Option<LitStr>,
    pub auto_register: Option<Span>,
    pub data_contract: bool,
    pub repr: EnumReprAttr,
    pub custom_attributes: CustomAttributes,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        parse_reflect_attrs(attrs, |input| {
            if input.peek(Token![@]) {
                return this.custom_attributes.parse_inner_stream(input);
            }

            let ident: Ident = input.parse()?;
            match ident.to_string().as_str() {
                "type_path" => {
                    input.parse::<Token![=]>()?;
                    let path: LitStr = input.parse()?;
                    if path.value().is_empty() {
                        return Err(syn::Error::new(path.span(), "`type_path` cannot be empty"));
                    }
                    this.type_path = Some(path);
                }
                "auto_register" => this.auto_register = Some(ident.span()),
                "data_contract" => this.data_contract = true,
                "as_int" => this.repr = EnumReprAttr::Integer,
                "as_char" => this.repr = EnumReprAttr::Char,
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown type attribute `{other}`"),
                    ));
                }
            }
            Ok(())
        })?;

        Ok(this)
    }
}
