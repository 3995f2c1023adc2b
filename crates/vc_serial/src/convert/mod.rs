//! Value converters: leaf values to and from their text forms.
//!
//! - [`scalar`]: numbers, bools, text, GUIDs, bytes, dates and durations.
//! - [`enums`]: named enums and flag sets.
//! - [`date`]: every date and duration text form.
//! - [`escape`]: string escaping per format.
//! - [`text_case`]: member naming conventions.

// -----------------------------------------------------------------------------
// Modules

pub mod date;
pub mod enums;
pub mod escape;
pub mod scalar;
pub mod text_case;
