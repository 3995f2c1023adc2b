use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

fn static_path_cell(vc_reflect_path: &syn::Path, generator: TokenStream) -> TokenStream {
    let path_cell_ = crate::path::generic_type_path_cell_(vc_reflect_path);

    quote! {
        static CELL: #path_cell_ = #path_cell_::new();
        CELL.get_or_insert::<Self>(|| {
            #generator
        })
    }
}

/// `concat(&[base, "<", A::method(), ", ", B::method(), ">"])`
fn generic_path(meta: &ReflectMeta, base: TokenStream, method: TokenStream) -> TokenStream {
    let vc_reflect_path = meta.vc_reflect_path();
    let concat_ = crate::path::concat_(vc_reflect_path);
    let type_path_ = crate::path::type_path_(vc_reflect_path);

    let mut parts = vec![base, quote! { "<" }];
    for (index, param) in meta.type_params().enumerate() {
        if index > 0 {
            parts.push(quote! { ", " });
        }
        parts.push(quote! { <#param as #type_path_>::#method() });
    }
    parts.push(quote! { ">" });

    quote! {
        #concat_(&[#(#parts),*])
    }
}

/// Generate implementation codes for `TypePath`
pub(crate) fn impl_trait_type_path(meta: &ReflectMeta) -> TokenStream {
    let vc_reflect_path = meta.vc_reflect_path();
    let trait_type_path_ = crate::path::type_path_(vc_reflect_path);

    let real_ident = meta.real_ident();
    let base_path = meta.base_type_path();
    let base_name = meta.base_type_name();

    let (type_path, type_name, inline_flag) = if meta.impl_with_generic() {
        (
            static_path_cell(
                vc_reflect_path,
                generic_path(meta, base_path, quote! { type_path }),
            ),
            static_path_cell(
                vc_reflect_path,
                generic_path(meta, quote! { #base_name }, quote! { type_name }),
            ),
            crate::utils::empty(),
        )
    } else {
        (base_path, quote! { #base_name }, quote! { #[inline] })
    };

    let type_ident = meta.type_ident_str();
    let module_path = meta.module_path();
    let option_ = crate::path::macro_exports_(vc_reflect_path);

    let (impl_generics, ty_generics, where_clause) =
        meta.split_generics_with(meta.type_path_bounds());

    quote! {
        impl #impl_generics #trait_type_path_ for #real_ident #ty_generics #where_clause {
            #inline_flag
            fn type_path() -> &'static str {
                #type_path
            }

            #inline_flag
            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn type_ident() -> &'static str {
                #type_ident
            }

            #[inline]
            fn module_path() -> #option_::Option<&'static str> {
                #module_path
            }
        }
    }
}
