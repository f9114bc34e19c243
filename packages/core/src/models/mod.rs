//! Data Models
//!
//! This module contains the core data structures:
//!
//! - `StructureMetadata` - Validated content template (root entity)
//! - `Property` - Scalar or block property (recursive through block components)
//! - `BlockProperty` / `BlockComponent` - Polymorphic, repeatable composite fields
//! - Custom-url documents consumed by routing (`RouteDocument`, `CustomUrlDocument`)
//!
//! Structure values are immutable once built; documents are read-only inputs.

pub mod block;
pub mod custom_url;
pub mod localized;
pub mod property;
pub mod structure;

pub use block::{BlockComponent, BlockProperty, Occurs};
pub use custom_url::{
    CustomUrlDocument, Localization, RouteDocument, RouteTarget, TargetDocument, Webspace,
    WorkflowStage,
};
pub use localized::LocalizedText;
pub use property::{Param, ParamValue, Property, PropertyDescriptor, Tag};
pub use structure::{CacheLifetime, CacheLifetimeType, StructureMetadata};
