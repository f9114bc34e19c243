//! Structure Loading Error Types
//!
//! Every failure while loading a structure definition is a [`MetadataError`].
//! The properties and block parsers return the same type as the loader, so
//! errors reach the caller unchanged, with the offending property or type
//! name intact.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading structure metadata
///
/// All variants are load-time failures. None are retried internally; retry
/// policy belongs to the caller.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Definition file does not exist or cannot be read
    #[error("Structure definition not found: {}", path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not well-formed or a node has an unexpected shape
    #[error("Malformed structure definition ({context}): {reason}")]
    MalformedDefinition { context: String, reason: String },

    /// Two sibling properties share a name
    #[error("Duplicate property '{name}'")]
    DuplicateProperty { name: String },

    /// Two components of the same block share a key
    #[error("Duplicate component '{component}' in block '{block}'")]
    DuplicateComponent { block: String, component: String },

    /// Property declares a content type that is not registered
    ///
    /// `available` lists the registered types for diagnostics.
    #[error(
        "Content type '{content_type}' of property '{property}' is not registered. Available types: {}",
        available.join(", ")
    )]
    UnknownType {
        property: String,
        content_type: String,
        available: Vec<String>,
    },

    /// Block default component does not name one of its components
    #[error("Default component '{component}' of block '{block}' does not exist")]
    InvalidDefaultComponent { block: String, component: String },

    /// Block minimum occurrence is greater than its maximum
    #[error("Invalid occurrence range for block '{block}': min {min} is greater than max {max}")]
    InvalidOccursRange { block: String, min: u32, max: u32 },

    /// Cache lifetime rejected by the cache lifetime resolver
    #[error("Unsupported cache lifetime '{value}' of type '{kind}'")]
    UnsupportedCacheLifetime { kind: String, value: String },

    /// Background load task panicked or was cancelled
    #[error("Loading {} did not complete: {reason}", path.display())]
    LoadInterrupted { path: PathBuf, reason: String },
}

impl MetadataError {
    /// Create a source not found error
    pub fn source_not_found(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceNotFound {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed definition error
    pub fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDefinition {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create a duplicate property error
    pub fn duplicate_property(name: impl Into<String>) -> Self {
        Self::DuplicateProperty { name: name.into() }
    }

    /// Create a duplicate component error
    pub fn duplicate_component(block: impl Into<String>, component: impl Into<String>) -> Self {
        Self::DuplicateComponent {
            block: block.into(),
            component: component.into(),
        }
    }

    /// Create an unknown type error
    pub fn unknown_type(
        property: impl Into<String>,
        content_type: impl Into<String>,
        available: impl IntoIterator<Item = String>,
    ) -> Self {
        Self::UnknownType {
            property: property.into(),
            content_type: content_type.into(),
            available: available.into_iter().collect(),
        }
    }

    /// Create an invalid default component error
    pub fn invalid_default_component(
        block: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self::InvalidDefaultComponent {
            block: block.into(),
            component: component.into(),
        }
    }

    /// Create an invalid occurrence range error
    pub fn invalid_occurs_range(block: impl Into<String>, min: u32, max: u32) -> Self {
        Self::InvalidOccursRange {
            block: block.into(),
            min,
            max,
        }
    }

    /// Create an unsupported cache lifetime error
    pub fn unsupported_cache_lifetime(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnsupportedCacheLifetime {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Create a load interrupted error
    pub fn load_interrupted(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::LoadInterrupted {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
