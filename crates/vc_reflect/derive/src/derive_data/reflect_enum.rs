use syn::ext::IdentExt;
use syn::{Fields, Variant, punctuated::Punctuated, token::Comma};

use crate::derive_data::{ReflectMeta, VariantAttributes};

pub(crate) struct EnumVariant<'a> {
    pub data: &'a Variant,
    pub attrs: VariantAttributes,
}

impl EnumVariant<'_> {
    /// Declared name, without `r#`.
    pub fn name(&self) -> String {
        self.data.ident.unraw().to_string()
    }
}

/// A field-less enum.
pub(crate) struct ReflectEnum<'a> {
    meta: ReflectMeta<'a>,
    variants: Vec<EnumVariant<'a>>,
}

impl<'a> ReflectEnum<'a> {
    pub fn new(meta: ReflectMeta<'a>, variants: &'a Punctuated<Variant, Comma>) -> syn::Result<Self> {
        if meta.impl_with_generic() {
            return Err(syn::Error::new_spanned(
                meta.real_ident(),
                "generic enums are not supported by `#[derive(Reflect)]`",
            ));
        }

        let variants = variants
            .iter()
            .map(|data| {
                if !matches!(data.fields, Fields::Unit) {
                    return Err(syn::Error::new_spanned(
                        &data.fields,
                        "only unit variants are supported by `#[derive(Reflect)]`",
                    ));
                }
                Ok(EnumVariant {
                    data,
                    attrs: VariantAttributes::parse_attrs(&data.attrs)?,
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        if variants.is_empty() {
            return Err(syn::Error::new_spanned(
                meta.real_ident(),
                "`#[derive(Reflect)]` needs at least one variant",
            ));
        }

        Ok(Self { meta, variants })
    }

    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }

    #[inline]
    pub fn variants(&self) -> &[EnumVariant<'a>] {
        &self.variants
    }
}
