use syn::{Attribute, Ident, LitStr, Token};

use super::{CustomAttributes, parse_reflect_attrs};

/// Field-level attributes.
///
/// - `rename = "..."`: wire alias.
/// - `ignore`: never serialized or deserialized.
/// - `data_member`: included when the struct is a data contract.
/// - `@expr`: custom attribute.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub ignore: bool,
    pub data_member: bool,
    pub custom_attributes: CustomAttributes,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        parse_reflect_attrs(attrs, |input| {
            if input.peek(Token![@]) {
                return this.custom_attributes.parse_inner_stream(input);
            }

            let ident: Ident = input.parse()?;
            match ident.to_string().as_str() {
                "rename" => {
                    input.parse::<Token![=]>()?;
                    this.rename = Some(input.parse()?);
                }
                "ignore" => this.ignore = true,
                "data_member" => this.data_member = true,
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown field attribute `{other}`"),
                    ));
                }
            }
            Ok(())
        })?;

        Ok(this)
    }
}

/// Variant-level attributes: `rename = "..."` and `@expr`.
#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
    pub custom_attributes: CustomAttributes,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        parse_reflect_attrs(attrs, |input| {
            if input.peek(Token![@]) {
                return this.custom_attributes.parse_inner_stream(input);
            }

            let ident: Ident = input.parse()?;
            match ident.to_string().as_str() {
                "rename" => {
                    input.parse::<Token![=]>()?;
                    this.rename = Some(input.parse()?);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown variant attribute `{other}`"),
                    ));
                }
            }
            Ok(())
        })?;

        Ok(this)
    }
}
