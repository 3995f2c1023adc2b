//! Small shared containers used across the `vc_*` crates.
//!
//! - [`hash`]: fixed-seed and pass-through hashers plus [`hashbrown`](hash::hashbrown) aliases.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId).
//! - [`collections::OrderedMap`]: an insertion-ordered hash map.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod collections;
pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
