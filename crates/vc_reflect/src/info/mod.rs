//! Static type information: paths, kinds and per-kind schemas.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod enum_info;
mod list_info;
mod map_info;
mod object_info;
mod option_info;
mod scalar_info;
mod struct_info;
mod ty;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use attributes::CustomAttributes;
pub use enum_info::{EnumInfo, EnumRepr, VariantInfo};
pub use list_info::{ListInfo, ListKind};
pub use map_info::MapInfo;
pub use object_info::{ObjectInfo, OpaqueInfo};
pub use option_info::OptionInfo;
pub use scalar_info::{ScalarInfo, ScalarKind};
pub use struct_info::{NamedField, StructInfo};
pub use ty::Type;
pub use type_info::{ReflectKind, ReflectKindError, TypeInfo};
pub use type_path::{DynamicTypePath, TypePath};
pub use typed::{DynamicTyped, Typed};
