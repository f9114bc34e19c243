//! Business Services
//!
//! - `StructureCache` - Memoized structure loading keyed by definition path
//!
//! Services sit in front of the stateless metadata loader.

pub mod structure_cache;

pub use structure_cache::{CacheStats, StructureCache};
