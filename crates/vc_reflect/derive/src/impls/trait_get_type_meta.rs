use proc_macro2::TokenStream;
use quote::quote;
use syn::{Type, WherePredicate};

use crate::derive_data::ReflectMeta;

/// Generate implementation codes for `GetTypeMeta`.
///
/// With `with_default`, the `TypeTraitDefault` constructor is inserted.
/// Every type in `dependencies` is registered alongside this one.
pub(crate) fn impl_trait_get_type_meta(
    meta: &ReflectMeta,
    with_default: bool,
    dependencies: &[&Type],
    bounds: Vec<WherePredicate>,
) -> TokenStream {
    let vc_reflect_path = meta.vc_reflect_path();
    let get_type_meta_ = crate::path::get_type_meta_(vc_reflect_path);
    let type_meta_ = crate::path::type_meta_(vc_reflect_path);
    let real_ident = meta.real_ident();

    let get_type_meta_body = if with_default {
        let from_type_ = crate::path::from_type_(vc_reflect_path);
        let type_trait_default_ = crate::path::type_trait_default_(vc_reflect_path);
        quote! {
            let mut meta = #type_meta_::with_capacity::<Self>(1);
            meta.insert_trait::<#type_trait_default_>(#from_type_::<Self>::from_type());
            meta
        }
    } else {
        quote! {
            #type_meta_::of::<Self>()
        }
    };

    let register_dependencies = if dependencies.is_empty() {
        crate::utils::empty()
    } else {
        let type_registry_ = crate::path::type_registry_(vc_reflect_path);
        quote! {
            fn register_dependencies(registry: &mut #type_registry_) {
                #( registry.register::<#dependencies>(); )*
            }
        }
    };

    let (impl_generics, ty_generics, where_clause) = meta.split_generics_with(bounds);

    quote! {
        impl #impl_generics #get_type_meta_ for #real_ident #ty_generics #where_clause {
            fn get_type_meta() -> #type_meta_ {
                #get_type_meta_body
            }

            #register_dependencies
        }
    }
}
