//! Kind-specific views over reflected values.

// -----------------------------------------------------------------------------
// Modules

mod enum_ops;
mod kind;
mod list_ops;
mod map_ops;
mod object;
mod option_ops;
mod scalar;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use enum_ops::Enum;
pub use kind::{ReflectMut, ReflectRef};
pub use list_ops::List;
pub use map_ops::Map;
pub use object::Object;
pub use option_ops::Nullable;
pub use scalar::{Bytes, Scalar, ScalarRef, ScalarValue};
pub use struct_ops::Struct;
