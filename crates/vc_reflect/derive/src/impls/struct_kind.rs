use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use crate::derive_data::ReflectStruct;

/// Implements `TypePath`, `Typed`, `Reflect`, `Struct` and `GetTypeMeta`
/// for a struct with named fields, or a unit struct.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();

    let field_types = info.unique_field_types();
    let reflect_bounds = meta.reflect_bounds(field_types.iter().copied());
    let type_meta_bounds = meta.type_meta_bounds(field_types.iter().copied());

    let type_path_trait_tokens = crate::impls::impl_trait_type_path(meta);
    let typed_trait_tokens =
        crate::impls::impl_trait_typed(meta, struct_info_generator(info), reflect_bounds.clone());
    let reflect_trait_tokens = crate::impls::impl_trait_reflect(
        meta,
        Ident::new("Struct", Span::call_site()),
        reflect_bounds.clone(),
    );
    let struct_trait_tokens = impl_struct_trait(info, reflect_bounds);
    let get_type_meta_tokens =
        crate::impls::impl_trait_get_type_meta(meta, true, &field_types, type_meta_bounds);
    let auto_register_tokens = crate::impls::get_auto_register_impl(meta);

    quote! {
        #type_path_trait_tokens

        #typed_trait_tokens

        #reflect_trait_tokens

        #struct_trait_tokens

        #get_type_meta_tokens

        #auto_register_tokens
    }
}

fn struct_info_generator(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let vc_reflect_path = meta.vc_reflect_path();
    let type_info_ = crate::path::type_info_(vc_reflect_path);
    let struct_info_ = crate::path::struct_info_(vc_reflect_path);
    let named_field_ = crate::path::named_field_(vc_reflect_path);

    let fields = info.fields().iter().map(|field| {
        let name = field.name();
        let ty = field.ty();
        let alias = field.attrs.rename.as_ref().map(|rename| quote! { .with_alias(#rename) });
        let ignore = field.attrs.ignore.then(|| quote! { .with_ignore(true) });
        let data_member = field.attrs.data_member.then(|| quote! { .with_data_member(true) });
        let custom_attributes = field.attrs.custom_attributes.get_expression_with(vc_reflect_path);

        quote! {
            #named_field_::new::<#ty>(#name)
                #alias
                #ignore
                #data_member
                #custom_attributes
        }
    });

    let data_contract = meta.attrs().data_contract.then(|| quote! { .with_data_contract(true) });
    let custom_attributes = meta.attrs().custom_attributes.get_expression_with(vc_reflect_path);

    quote! {
        #type_info_::Struct(
            #struct_info_::new::<Self>(&[
                #(#fields),*
            ])
            #data_contract
            #custom_attributes
        )
    }
}

fn impl_struct_trait(info: &ReflectStruct, bounds: Vec<syn::WherePredicate>) -> TokenStream {
    let meta = info.meta();
    let vc_reflect_path = meta.vc_reflect_path();
    let struct_ = crate::path::struct_(vc_reflect_path);
    let reflect_ = crate::path::reflect_(vc_reflect_path);
    let option_ = crate::path::macro_exports_(vc_reflect_path);
    let real_ident = meta.real_ident();

    let field_len = info.fields().len();
    let names: Vec<String> = info.fields().iter().map(|field| field.name()).collect();
    let indices: Vec<usize> = info.fields().iter().map(|field| field.index).collect();
    let members: Vec<&Ident> = info
        .fields()
        .iter()
        .filter_map(|field| field.data.ident.as_ref())
        .collect();

    let (impl_generics, ty_generics, where_clause) = meta.split_generics_with(bounds);

    if field_len == 0 {
        return quote! {
            impl #impl_generics #struct_ for #real_ident #ty_generics #where_clause {
                #[inline]
                fn field(&self, _name: &str) -> #option_::Option<&dyn #reflect_> {
                    #option_::Option::None
                }

                #[inline]
                fn field_mut(&mut self, _name: &str) -> #option_::Option<&mut dyn #reflect_> {
                    #option_::Option::None
                }

                #[inline]
                fn field_at(&self, _index: usize) -> #option_::Option<&dyn #reflect_> {
                    #option_::Option::None
                }

                #[inline]
                fn field_at_mut(&mut self, _index: usize) -> #option_::Option<&mut dyn #reflect_> {
                    #option_::Option::None
                }

                #[inline]
                fn field_len(&self) -> usize {
                    0
                }
            }
        };
    }

    quote! {
        impl #impl_generics #struct_ for #real_ident #ty_generics #where_clause {
            fn field(&self, name: &str) -> #option_::Option<&dyn #reflect_> {
                match name {
                    #( #names => #option_::Option::Some(&self.#members), )*
                    _ => #option_::Option::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> #option_::Option<&mut dyn #reflect_> {
                match name {
                    #( #names => #option_::Option::Some(&mut self.#members), )*
                    _ => #option_::Option::None,
                }
            }

            fn field_at(&self, index: usize) -> #option_::Option<&dyn #reflect_> {
                match index {
                    #( #indices => #option_::Option::Some(&self.#members), )*
                    _ => #option_::Option::None,
                }
            }

            fn field_at_mut(&mut self, index: usize) -> #option_::Option<&mut dyn #reflect_> {
                match index {
                    #( #indices => #option_::Option::Some(&mut self.#members), )*
                    _ => #option_::Option::None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #field_len
            }
        }
    }
}
