//! Content Type Registry
//!
//! The loader validates every declared property type against a
//! [`ContentTypeRegistry`]. The registry is an injected, read-only
//! collaborator; population happens outside the loader.

use std::collections::BTreeSet;

/// Set of known content type identifiers
pub trait ContentTypeRegistry: Send + Sync {
    /// Whether `content_type` is registered
    fn has(&self, content_type: &str) -> bool;

    /// All registered identifiers (used for error diagnostics)
    fn get_all(&self) -> BTreeSet<String>;
}

/// Content types shipped with the admin form
pub const DEFAULT_CONTENT_TYPES: &[&str] = &[
    "block",
    "checkbox",
    "color",
    "date",
    "email",
    "image_selection",
    "media_selection",
    "page_selection",
    "phone",
    "resource_locator",
    "single_select",
    "smart_content_selection",
    "text_area",
    "text_editor",
    "text_line",
    "url",
];

/// Immutable in-memory registry
#[derive(Debug, Clone, Default)]
pub struct ContentTypeManager {
    types: BTreeSet<String>,
}

impl ContentTypeManager {
    /// Create a registry holding exactly the given types
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a registry with [`DEFAULT_CONTENT_TYPES`]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CONTENT_TYPES.iter().copied())
    }

    /// Return a registry with additional types registered
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl ContentTypeRegistry for ContentTypeManager {
    fn has(&self, content_type: &str) -> bool {
        self.types.contains(content_type)
    }

    fn get_all(&self) -> BTreeSet<String> {
        self.types.clone()
    }
}
