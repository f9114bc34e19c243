//! Structure Metadata Loading
//!
//! This module reads XML structure definitions and validates them:
//!
//! - `StructureLoader` - Entry point, produces `StructureMetadata`
//! - `PropertiesParser` - Ordered property lists, params and tags
//! - `BlockParser` - Recursive block components (internal)
//! - Collaborator traits: `ContentTypeRegistry`, `CacheLifetimeResolver`,
//!   `ExpressionEvaluator`
//!
//! All parse failures are `MetadataError` values and propagate unchanged.

mod block_parser;
pub mod cache_lifetime;
pub mod config;
pub mod content_types;
pub mod error;
pub mod expression;
pub mod loader;
pub mod properties_parser;
mod xml;


pub use cache_lifetime::{CacheLifetimeResolver, DefaultCacheLifetimeResolver};
pub use config::{InvalidTypePolicy, LoaderConfig, INVALID_TYPE_POLICY_ENV};
pub use content_types::{ContentTypeManager, ContentTypeRegistry, DEFAULT_CONTENT_TYPES};
pub use error::MetadataError;
pub use expression::{
    ExpressionContext, ExpressionError, ExpressionEvaluator, JsonExpressionEvaluator,
};
pub use loader::StructureLoader;
pub use properties_parser::PropertiesParser;
