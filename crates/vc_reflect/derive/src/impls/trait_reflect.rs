use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::WherePredicate;

use crate::derive_data::ReflectMeta;

/// Generate implementation codes for `Reflect`.
///
/// `kind` names the `ReflectKind`, `ReflectRef` and `ReflectMut` variant.
pub(crate) fn impl_trait_reflect(
    meta: &ReflectMeta,
    kind: Ident,
    bounds: Vec<WherePredicate>,
) -> TokenStream {
    let vc_reflect_path = meta.vc_reflect_path();
    let reflect_ = crate::path::reflect_(vc_reflect_path);
    let reflect_kind_ = crate::path::reflect_kind_(vc_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(vc_reflect_path);
    let reflect_mut_ = crate::path::reflect_mut_(vc_reflect_path);
    let macro_exports_ = crate::path::macro_exports_(vc_reflect_path);
    let real_ident = meta.real_ident();

    let (impl_generics, ty_generics, where_clause) = meta.split_generics_with(bounds);

    quote! {
        impl #impl_generics #reflect_ for #real_ident #ty_generics #where_clause {
            fn set(
                &mut self,
                value: #macro_exports_::Box<dyn #reflect_>,
            ) -> ::core::result::Result<(), #macro_exports_::Box<dyn #reflect_>> {
                *self = value.take::<Self>()?;
                ::core::result::Result::Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> #reflect_kind_ {
                #reflect_kind_::#kind
            }

            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::#kind(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_::#kind(self)
            }

            #[inline]
            fn reflect_clone(&self) -> #macro_exports_::Box<dyn #reflect_> {
                #macro_exports_::Box::new(::core::clone::Clone::clone(self))
            }
        }
    }
}
