use proc_macro2::TokenStream;
use quote::quote;
use syn::WherePredicate;

use crate::derive_data::ReflectMeta;

/// Generate implementation codes for `Typed`.
///
/// `info_generator` builds the `TypeInfo`; it runs once per type, or once
/// per instantiation for generic types.
pub(crate) fn impl_trait_typed(
    meta: &ReflectMeta,
    info_generator: TokenStream,
    bounds: Vec<WherePredicate>,
) -> TokenStream {
    let vc_reflect_path = meta.vc_reflect_path();
    let typed_ = crate::path::typed_(vc_reflect_path);
    let type_info_ = crate::path::type_info_(vc_reflect_path);
    let real_ident = meta.real_ident();

    let body = if meta.impl_with_generic() {
        let cell_ = crate::path::generic_type_info_cell_(vc_reflect_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_insert::<Self>(|| {
                #info_generator
            })
        }
    } else {
        let cell_ = crate::path::non_generic_type_info_cell_(vc_reflect_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_init(|| {
                #info_generator
            })
        }
    };

    let (impl_generics, ty_generics, where_clause) = meta.split_generics_with(bounds);

    quote! {
        impl #impl_generics #typed_ for #real_ident #ty_generics #where_clause {
            fn type_info() -> &'static #type_info_ {
                #body
            }
        }
    }
}
