//! The type registry: runtime lookup of reflected types by id, path or name.
//!
//! - [`TypeTrait`]: a capability attached to a registered type.
//! - [`FromType`]: builds a `TypeTrait` for a concrete type.
//! - [`TypeMeta`]: a [`TypeInfo`](crate::info::TypeInfo) plus its `TypeTrait` table.
//! - [`GetTypeMeta`]: implemented by every reflected type, usually derived.
//! - [`TypeRegistry`] / [`TypeRegistryArc`]: the store and its shared handle.
//!
//! Types deriving `Reflect` with `#[reflect(auto_register)]` are collected by
//! [`TypeRegistry::auto_register`] when the `auto_register` feature is on.

// -----------------------------------------------------------------------------
// Modules

mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use traits::TypeTraitDefault;
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::{TypeRegistry, TypeRegistryArc};
pub use type_trait::TypeTrait;
