// -----------------------------------------------------------------------------
// Modules

mod ordered_map;

// -----------------------------------------------------------------------------
// Exports

pub use ordered_map::OrderedMap;
