//! Structure Metadata
//!
//! Root entity produced by the structure loader. A [`StructureMetadata`] is
//! built once per load of a definition file and never mutated afterwards;
//! when the backing file changes a new value is loaded (see
//! [`crate::services::StructureCache`]).
//!
//! ## Example Definition
//!
//! ```xml
//! <template>
//!     <key>default</key>
//!     <view>pages/default</view>
//!     <cacheLifetime type="seconds">2400</cacheLifetime>
//!     <internal>false</internal>
//!     <properties>
//!         <property name="title" type="text_line" mandatory="true"/>
//!     </properties>
//! </template>
//! ```

use crate::models::localized::LocalizedText;
use crate::models::property::{find_property, Property, Tag};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of cache lifetime directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheLifetimeType {
    /// Fixed number of seconds
    Seconds,

    /// Cron expression computing the next expiry
    Expression,
}

impl CacheLifetimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Expression => "expression",
        }
    }

    /// Parse the `type` attribute of a `<cacheLifetime>` element
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "seconds" => Some(Self::Seconds),
            "expression" => Some(Self::Expression),
            _ => None,
        }
    }
}

impl fmt::Display for CacheLifetimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP cache lifetime of pages rendered from a structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheLifetime {
    #[serde(rename = "type")]
    pub kind: CacheLifetimeType,
    pub value: String,
}

impl CacheLifetime {
    pub fn new(kind: CacheLifetimeType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Validated, immutable structure definition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureMetadata {
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    controller: Option<String>,
    internal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_lifetime: Option<CacheLifetime>,
    tags: Vec<Tag>,
    title: LocalizedText,
    properties: Vec<Property>,
    #[serde(skip)]
    source: PathBuf,
}

/// Field values for constructing a [`StructureMetadata`]
#[derive(Debug, Default)]
pub(crate) struct StructureParts {
    pub key: String,
    pub view: Option<String>,
    pub controller: Option<String>,
    pub internal: bool,
    pub cache_lifetime: Option<CacheLifetime>,
    pub tags: Vec<Tag>,
    pub title: LocalizedText,
    pub properties: Vec<Property>,
    pub source: PathBuf,
}

impl StructureMetadata {
    pub(crate) fn from_parts(parts: StructureParts) -> Self {
        Self {
            key: parts.key,
            view: parts.view,
            controller: parts.controller,
            internal: parts.internal,
            cache_lifetime: parts.cache_lifetime,
            tags: parts.tags,
            title: parts.title,
            properties: parts.properties,
            source: parts.source,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn view(&self) -> Option<&str> {
        self.view.as_deref()
    }

    pub fn controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }

    /// Internal structures are not selectable by editors
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    pub fn cache_lifetime(&self) -> Option<&CacheLifetime> {
        self.cache_lifetime.as_ref()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }

    pub fn title(&self, locale: &str) -> Option<&str> {
        self.title.get(locale)
    }

    /// Top-level properties in document order
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        find_property(&self.properties, name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(Property::name)
    }

    /// Properties carrying the given tag, in document order
    pub fn properties_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Property> {
        self.properties
            .iter()
            .filter(move |property| property.descriptor().has_tag(tag))
    }

    /// Definition file this structure was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }
}
