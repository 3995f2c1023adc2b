//! Text formats over the untyped [`Value`](crate::Value) tree.
//!
//! Each format has a writer (`write_value`, `to_string`) and a reader
//! (`parse`). CSV lives in [`crate::csv`] since it needs the target type
//! to read headers.

// -----------------------------------------------------------------------------
// Modules

mod indent;

pub mod json;
pub mod jsv;

// -----------------------------------------------------------------------------
// Exports

pub use indent::indent_json;
