//! Parsers for `#[reflect(...)]` on types, fields and variants.

// -----------------------------------------------------------------------------
// Modules

mod custom_attributes;
mod field_attributes;
mod type_attributes;

// -----------------------------------------------------------------------------
// Internal API

use custom_attributes::CustomAttributes;

pub(crate) use field_attributes::{FieldAttributes, VariantAttributes};
pub(crate) use type_attributes::{EnumReprAttr, TypeAttributes};

use syn::parse::ParseStream;
use syn::{Attribute, Token};

/// Runs `parse_entry` on every comma separated entry of each `#[reflect(...)]`.
fn parse_reflect_attrs(
    attrs: &[Attribute],
    mut parse_entry: impl FnMut(ParseStream) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs {
        if !attr.path().is_ident(crate::REFLECT_ATTRIBUTE_NAME) {
            continue;
        }
        attr.parse_args_with(|input: ParseStream| {
            while !input.is_empty() {
                parse_entry(input)?;
                if input.is_empty() {
                    break;
                }
                input.parse::<Token![,]>()?;
            }
            Ok(())
        })?;
    }
    Ok(())
}
