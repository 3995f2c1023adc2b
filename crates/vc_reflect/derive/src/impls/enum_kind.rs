use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use crate::derive_data::{EnumReprAttr, ReflectEnum};

/// Implements `TypePath`, `Typed`, `Reflect`, `Enum` and `GetTypeMeta`
/// for a field-less enum.
pub(crate) fn impl_enum(info: &ReflectEnum) -> TokenStream {
    let meta = info.meta();

    let type_path_trait_tokens = crate::impls::impl_trait_type_path(meta);
    let typed_trait_tokens =
        crate::impls::impl_trait_typed(meta, enum_info_generator(info), Vec::new());
    let reflect_trait_tokens =
        crate::impls::impl_trait_reflect(meta, Ident::new("Enum", Span::call_site()), Vec::new());
    let enum_trait_tokens = impl_enum_trait(info);
    let get_type_meta_tokens = crate::impls::impl_trait_get_type_meta(meta, false, &[], Vec::new());
    let auto_register_tokens = crate::impls::get_auto_register_impl(meta);

    quote! {
        #type_path_trait_tokens

        #typed_trait_tokens

        #reflect_trait_tokens

        #enum_trait_tokens

        #get_type_meta_tokens

        #auto_register_tokens
    }
}

fn enum_info_generator(info: &ReflectEnum) -> TokenStream {
    let meta = info.meta();
    let vc_reflect_path = meta.vc_reflect_path();
    let type_info_ = crate::path::type_info_(vc_reflect_path);
    let enum_info_ = crate::path::enum_info_(vc_reflect_path);
    let enum_repr_ = crate::path::enum_repr_(vc_reflect_path);
    let variant_info_ = crate::path::variant_info_(vc_reflect_path);
    let reflect_ = crate::path::reflect_(vc_reflect_path);
    let macro_exports_ = crate::path::macro_exports_(vc_reflect_path);

    let variants = info.variants().iter().map(|variant| {
        let name = variant.name();
        let ident = &variant.data.ident;
        let alias = variant.attrs.rename.as_ref().map(|rename| quote! { .with_alias(#rename) });
        let custom_attributes = variant.attrs.custom_attributes.get_expression_with(vc_reflect_path);

        quote! {
            #variant_info_::new(#name, Self::#ident as i64)
                #alias
                #custom_attributes
        }
    });

    let idents: Vec<&Ident> = info.variants().iter().map(|variant| &variant.data.ident).collect();
    let first = idents[0];

    let repr = match meta.attrs().repr {
        EnumReprAttr::Name => crate::utils::empty(),
        EnumReprAttr::Integer => quote! { .with_repr(#enum_repr_::Integer) },
        EnumReprAttr::Char => quote! { .with_repr(#enum_repr_::Char) },
    };
    let custom_attributes = meta.attrs().custom_attributes.get_expression_with(vc_reflect_path);

    quote! {
        #type_info_::Enum(
            #enum_info_::new::<Self>(
                &[
                    #(#variants),*
                ],
                |discriminant: i64| -> #macro_exports_::Option<#macro_exports_::Box<dyn #reflect_>> {
                    #(
                        if discriminant == Self::#idents as i64 {
                            return #macro_exports_::Option::Some(#macro_exports_::Box::new(Self::#idents));
                        }
                    )*
                    #macro_exports_::Option::None
                },
                || -> #macro_exports_::Box<dyn #reflect_> {
                    #macro_exports_::Box::new(Self::#first)
                },
            )
            #repr
            #custom_attributes
        )
    }
}

fn impl_enum_trait(info: &ReflectEnum) -> TokenStream {
    let meta = info.meta();
    let vc_reflect_path = meta.vc_reflect_path();
    let enum_ = crate::path::enum_(vc_reflect_path);
    let real_ident = meta.real_ident();

    let idents: Vec<&Ident> = info.variants().iter().map(|variant| &variant.data.ident).collect();

    quote! {
        impl #enum_ for #real_ident {
            fn discriminant(&self) -> i64 {
                match self {
                    #( Self::#idents => Self::#idents as i64, )*
                }
            }

            fn set_discriminant(&mut self, discriminant: i64) -> bool {
                #(
                    if discriminant == Self::#idents as i64 {
                        *self = Self::#idents;
                        return true;
                    }
                )*
                false
            }
        }
    }
}
