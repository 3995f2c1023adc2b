// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod enum_kind;
mod match_reflect;
mod struct_kind;
mod trait_get_type_meta;
mod trait_reflect;
mod trait_type_path;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use auto_register::get_auto_register_impl;
pub(crate) use enum_kind::impl_enum;
pub(crate) use match_reflect::match_reflect_impls;
pub(crate) use struct_kind::impl_struct;
pub(crate) use trait_get_type_meta::impl_trait_get_type_meta;
pub(crate) use trait_reflect::impl_trait_reflect;
pub(crate) use trait_type_path::impl_trait_type_path;
pub(crate) use trait_typed::impl_trait_typed;
