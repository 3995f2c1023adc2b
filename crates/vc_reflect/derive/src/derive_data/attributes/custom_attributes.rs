use proc_macro2::TokenStream;
use quote::quote;
use syn::{Expr, Path, Token, parse::ParseStream};

/// Expressions collected from `@expr` entries.
///
/// This corresponds to `vc_reflect::info::CustomAttributes`.
#[derive(Default)]
pub(crate) struct CustomAttributes {
    attributes: Vec<Expr>,
}

impl CustomAttributes {
    /// Parses one `@expr` entry.
    ///
    /// Examples:
    /// - `#[reflect(@RuntimeSerializable)]`
    /// - `#[reflect(@Range(0, 10))]`
    pub fn parse_inner_stream(&mut self, input: ParseStream) -> syn::Result<()> {
        input.parse::<Token![@]>()?;
        self.attributes.push(input.parse()?);
        Ok(())
    }

    /// Returns `.with_custom_attributes(...)`, or nothing when empty.
    pub fn get_expression_with(&self, vc_reflect_path: &Path) -> TokenStream {
        if self.attributes.is_empty() {
            return crate::utils::empty();
        }

        let capacity = self.attributes.len();
        let custom_attributes_ = crate::path::custom_attributes_(vc_reflect_path);
        let with_attributes = self.attributes.iter().map(|value| {
            quote! {
                .with_attribute(#value)
            }
        });

        quote! {
            .with_custom_attributes(
                #custom_attributes_::with_capacity(#capacity)
                    #(#with_attributes)*
            )
        }
    }
}
