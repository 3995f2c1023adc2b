use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, Ident, Type, WherePredicate, parse_quote};

use crate::derive_data::TypeAttributes;

/// Data shared by every kind of derive.
pub(crate) struct ReflectMeta<'a> {
    attrs: TypeAttributes,
    type_ident: &'a Ident,
    generics: &'a Generics,
    vc_reflect_path: syn::Path,
}

impl<'a> ReflectMeta<'a> {
    pub fn new(type_ident: &'a Ident, generics: &'a Generics, attrs: TypeAttributes) -> Self {
        Self {
            attrs,
            type_ident,
            generics,
            vc_reflect_path: crate::path::vc_reflect(),
        }
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn real_ident(&self) -> &Ident {
        self.type_ident
    }

    #[inline]
    pub fn vc_reflect_path(&self) -> &syn::Path {
        &self.vc_reflect_path
    }

    /// Whether the type has type parameters, which moves paths and
    /// type info into per-instantiation cells.
    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        self.generics.type_params().next().is_some()
    }

    pub fn type_params(&self) -> impl Iterator<Item = &Ident> {
        self.generics.type_params().map(|param| &param.ident)
    }

    /// The bare identifier as written.
    pub fn type_ident_str(&self) -> String {
        self.type_ident.to_string()
    }

    /// Full path without generics, as a `&'static str` expression.
    pub fn base_type_path(&self) -> TokenStream {
        match &self.attrs.type_path {
            Some(path) => quote! { #path },
            None => {
                let suffix = format!("::{}", self.type_ident);
                quote! { ::core::concat!(::core::module_path!(), #suffix) }
            }
        }
    }

    /// Name without modules or generics.
    pub fn base_type_name(&self) -> String {
        match &self.attrs.type_path {
            Some(path) => crate::utils::split_type_path(&path.value()).1.to_string(),
            None => self.type_ident.to_string(),
        }
    }

    /// Module part of the path, as an `Option<&'static str>` expression.
    pub fn module_path(&self) -> TokenStream {
        let option_ = crate::path::macro_exports_(&self.vc_reflect_path);
        match &self.attrs.type_path {
            Some(path) => match crate::utils::split_type_path(&path.value()).0 {
                Some(module) => quote! { #option_::Option::Some(#module) },
                None => quote! { #option_::Option::None },
            },
            None => quote! { #option_::Option::Some(::core::module_path!()) },
        }
    }

    /// Splits generics for an impl, adding `extra` to the where clause.
    pub fn split_generics_with(
        &self,
        extra: impl IntoIterator<Item = WherePredicate>,
    ) -> (TokenStream, TokenStream, TokenStream) {
        let (impl_generics, ty_generics, _) = self.generics.split_for_impl();

        let mut where_clause = self.generics.where_clause.clone().unwrap_or_else(|| syn::WhereClause {
            where_token: Default::default(),
            predicates: Default::default(),
        });
        where_clause.predicates.extend(extra);

        let where_clause = if where_clause.predicates.is_empty() {
            crate::utils::empty()
        } else {
            quote! { #where_clause }
        };

        (quote! { #impl_generics }, quote! { #ty_generics }, where_clause)
    }

    /// `T: TypePath` for every type parameter.
    pub fn type_path_bounds(&self) -> Vec<WherePredicate> {
        let type_path_ = crate::path::type_path_(&self.vc_reflect_path);
        self.type_params()
            .map(|ident| parse_quote! { #ident: #type_path_ })
            .collect()
    }

    /// Bounds for `Typed`, `Reflect` and the kind trait of a generic type.
    pub fn reflect_bounds<'f>(&self, field_types: impl Iterator<Item = &'f Type>) -> Vec<WherePredicate> {
        if !self.impl_with_generic() {
            return Vec::new();
        }

        let reflect_ = crate::path::reflect_(&self.vc_reflect_path);
        let typed_ = crate::path::typed_(&self.vc_reflect_path);
        let real_ident = self.type_ident;
        let (_, ty_generics, _) = self.generics.split_for_impl();

        let mut bounds = self.type_path_bounds();
        bounds.push(parse_quote! { #real_ident #ty_generics: ::core::clone::Clone + ::core::default::Default });
        bounds.extend(field_types.map(|ty| -> WherePredicate { parse_quote! { #ty: #reflect_ + #typed_ } }));
        bounds
    }

    /// `reflect_bounds` plus `GetTypeMeta` on every field type.
    pub fn type_meta_bounds<'f>(
        &self,
        field_types: impl Iterator<Item = &'f Type> + Clone,
    ) -> Vec<WherePredicate> {
        if !self.impl_with_generic() {
            return Vec::new();
        }

        let get_type_meta_ = crate::path::get_type_meta_(&self.vc_reflect_path);
        let mut bounds = self.reflect_bounds(field_types.clone());
        bounds.extend(field_types.map(|ty| -> WherePredicate { parse_quote! { #ty: #get_type_meta_ } }));
        bounds
    }
}
