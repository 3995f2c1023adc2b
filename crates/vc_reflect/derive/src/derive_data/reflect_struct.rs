use syn::ext::IdentExt;
use syn::{Field, Fields, Type};

use crate::derive_data::{FieldAttributes, ReflectMeta};

/// A named field and its attributes.
pub(crate) struct StructField<'a> {
    pub data: &'a Field,
    pub attrs: FieldAttributes,
    /// Declaration order.
    pub index: usize,
}

impl StructField<'_> {
    /// Declared name, without `r#`.
    pub fn name(&self) -> String {
        match &self.data.ident {
            Some(ident) => ident.unraw().to_string(),
            None => self.index.to_string(),
        }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.data.ty
    }
}

/// A struct with named fields, or a unit struct.
pub(crate) struct ReflectStruct<'a> {
    meta: ReflectMeta<'a>,
    fields: Vec<StructField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    pub fn new(meta: ReflectMeta<'a>, fields: &'a Fields) -> syn::Result<Self> {
        let fields = match fields {
            Fields::Named(named) => named
                .named
                .iter()
                .enumerate()
                .map(|(index, data)| {
                    Ok(StructField {
                        data,
                        attrs: FieldAttributes::parse_attrs(&data.attrs)?,
                        index,
                    })
                })
                .collect::<syn::Result<Vec<_>>>()?,
            Fields::Unit => Vec::new(),
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new_spanned(
                    unnamed,
                    "tuple structs are not supported by `#[derive(Reflect)]`, use named fields",
                ));
            }
        };

        Ok(Self { meta, fields })
    }

    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }

    #[inline]
    pub fn fields(&self) -> &[StructField<'a>] {
        &self.fields
    }

    /// Field types with duplicates removed, in declaration order.
    pub fn unique_field_types(&self) -> Vec<&Type> {
        let mut seen = Vec::<String>::new();
        let mut types = Vec::new();
        for field in &self.fields {
            let key = quote::ToTokens::to_token_stream(field.ty()).to_string();
            if !seen.contains(&key) {
                seen.push(key);
                types.push(field.ty());
            }
        }
        types
    }
}
