//! Derive macro for `vc_reflect`. See [`Reflect`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements the following traits:
///
/// - `TypePath`
/// - `Typed`
/// - `Reflect`
/// - `GetTypeMeta`
/// - `Struct` (for `struct T { ... }` and `struct T;`)
/// - `Enum` (for field-less `enum T { ... }`)
///
/// Structs must also implement `Clone` and `Default`; enums must implement
/// `Clone`. Tuple structs, unions, enums with fields and lifetime or const
/// parameters are rejected.
///
/// ## Type attributes
///
/// ```rust, ignore
/// #[derive(Reflect, Clone, Default)]
/// #[reflect(type_path = "my_app::dto::Customer")]
/// #[reflect(auto_register, data_contract)]
/// struct Customer {
///     #[reflect(data_member, rename = "id")]
///     customer_id: i32,
///     notes: String,
/// }
/// ```
///
/// - `type_path = "..."`: replaces the default `module_path!()::Ident`.
///   The runtime type resolver matches type hints against this path.
/// - `auto_register`: collects the type for `TypeRegistry::auto_register`.
///   Not available for generic types.
/// - `data_contract`: only fields marked `data_member` are serialized.
/// - `as_int` / `as_char`: enums are written by discriminant, as a number
///   or as a character code, instead of by name.
/// - `@expr`: stores `expr` as a custom attribute.
///
/// ## Field attributes
///
/// - `rename = "..."`: the name used on the wire.
/// - `ignore`: never serialized, left at its default when deserializing.
/// - `data_member`: included when the struct is a `data_contract`.
/// - `@expr`: custom attribute.
///
/// ## Variant attributes
///
/// - `rename = "..."`: the name used on the wire.
/// - `@expr`: custom attribute.
///
/// ## Generics
///
/// Type parameters are supported on structs. Path strings and type info are
/// built once per instantiation, and every field type must itself be
/// reflectable.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    impls::match_reflect_impls(ast)
}
