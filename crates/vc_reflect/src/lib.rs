//! Runtime type metadata for the `vc_text` serializers.
//!
//! Every reflected type belongs to one of a small, closed set of kinds
//! ([`ReflectKind`](info::ReflectKind)): scalars, enums, nullable values,
//! lists, maps, structs, polymorphic [`Object`](ops::Object) slots and
//! opaque values. A type's shape is described once by a static
//! [`TypeInfo`](info::TypeInfo), and values are read and written through
//! the [`Reflect`] trait family without per-type generated serializers.
//!
//! ```
//! use vc_reflect::{Reflect, derive::Reflect, info::Typed, ops::Struct};
//!
//! #[derive(Reflect, Clone, Default)]
//! struct Customer {
//!     id: i32,
//!     #[reflect(rename = "customer_name")]
//!     name: String,
//! }
//!
//! let info = Customer::type_info().as_struct().unwrap();
//! assert_eq!(info.field("name").unwrap().wire_name(), "customer_name");
//!
//! let value = Customer { id: 7, name: "Ann".into() };
//! let id = value.field("id").unwrap().downcast_ref::<i32>();
//! assert_eq!(id, Some(&7));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macro emits `::vc_reflect::...` paths, so the crate must be
// reachable under its own name from inside itself.
extern crate self as vc_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod impls;
pub mod info;
pub mod ops;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use reflection::Reflect;
pub use vc_reflect_derive as derive;
