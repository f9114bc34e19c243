//! ContentSpace Core
//!
//! This crate provides the content-modelling and routing core for the
//! ContentSpace content-management system.
//!
//! # Architecture
//!
//! - **Structure-as-XML**: Content templates ("structures") are defined in XML
//!   files and loaded into immutable [`StructureMetadata`] values
//! - **Recursive blocks**: Block properties own named components, each of which
//!   is a full property list (blocks may contain blocks)
//! - **Injected collaborators**: Content type registry, cache-lifetime resolver
//!   and expression evaluator are passed in explicitly, never global
//! - **Stateless routing**: Custom-url route decisions are recomputed per request
//!
//! # Modules
//!
//! - [`models`] - Data structures (StructureMetadata, Property, BlockComponent, documents)
//! - [`metadata`] - XML loading, property/block parsing and validation
//! - [`routing`] - Custom-url route resolution
//! - [`services`] - Structure cache for memoized loading

pub mod metadata;
pub mod models;
pub mod routing;
pub mod services;

// Re-export commonly used types
pub use metadata::*;
pub use models::*;
pub use routing::*;
pub use services::*;
