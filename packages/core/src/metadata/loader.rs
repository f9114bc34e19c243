//! Structure Loader
//!
//! Entry point for reading a structure definition file into
//! [`StructureMetadata`]. The loader keeps no state between calls apart from
//! its injected collaborators; memoization is the caller's job (see
//! [`crate::services::StructureCache`]).
//!
//! ## Example Usage
//!
//! ```no_run
//! # use contentspace_core::metadata::{
//! #     ContentTypeManager, DefaultCacheLifetimeResolver, JsonExpressionEvaluator,
//! #     LoaderConfig, PropertiesParser, StructureLoader,
//! # };
//! # use std::sync::Arc;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = StructureLoader::new(
//!     Arc::new(DefaultCacheLifetimeResolver),
//!     PropertiesParser::new(Arc::new(JsonExpressionEvaluator)),
//!     Arc::new(ContentTypeManager::with_defaults()),
//!     LoaderConfig::default(),
//! );
//!
//! let structure = loader.load("templates/default.xml")?;
//! println!("{} has {} properties", structure.key(), structure.properties().len());
//! # Ok(())
//! # }
//! ```

use crate::metadata::cache_lifetime::CacheLifetimeResolver;
use crate::metadata::config::{InvalidTypePolicy, LoaderConfig};
use crate::metadata::content_types::ContentTypeRegistry;
use crate::metadata::error::MetadataError;
use crate::metadata::properties_parser::PropertiesParser;
use crate::metadata::xml;
use crate::models::structure::StructureParts;
use crate::models::{CacheLifetime, CacheLifetimeType, StructureMetadata};
use roxmltree::{Document, Node};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loads structure definitions from XML
pub struct StructureLoader {
    cache_lifetime_resolver: Arc<dyn CacheLifetimeResolver>,
    properties_parser: PropertiesParser,
    content_types: Arc<dyn ContentTypeRegistry>,
    config: LoaderConfig,
}

impl StructureLoader {
    /// Create a new StructureLoader
    ///
    /// # Arguments
    ///
    /// * `cache_lifetime_resolver` - Validates `<cacheLifetime>` directives
    /// * `properties_parser` - Parses the property list
    /// * `content_types` - Registry every property type is checked against
    /// * `config` - Loader-wide defaults (invalid type policy)
    pub fn new(
        cache_lifetime_resolver: Arc<dyn CacheLifetimeResolver>,
        properties_parser: PropertiesParser,
        content_types: Arc<dyn ContentTypeRegistry>,
        config: LoaderConfig,
    ) -> Self {
        Self {
            cache_lifetime_resolver,
            properties_parser,
            content_types,
            config,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a structure with the configured invalid type policy
    ///
    /// # Errors
    ///
    /// - `SourceNotFound`: File missing or unreadable
    /// - `MalformedDefinition`: Not UTF-8, invalid XML or unexpected node shape
    /// - `UnsupportedCacheLifetime`: Resolver rejected the cache lifetime
    /// - Any error from the properties or block parser, unchanged
    pub fn load(&self, path: impl AsRef<Path>) -> Result<StructureMetadata, MetadataError> {
        self.load_with_policy(path, self.config.invalid_type_policy)
    }

    /// Load a structure with an explicit invalid type policy
    pub fn load_with_policy(
        &self,
        path: impl AsRef<Path>,
        policy: InvalidTypePolicy,
    ) -> Result<StructureMetadata, MetadataError> {
        let path = path.as_ref();
        let content =
            std::fs::read(path).map_err(|source| MetadataError::source_not_found(path, source))?;

        self.load_from_bytes(&content, path, policy)
    }

    /// Parse a structure definition from raw file contents
    ///
    /// Contents that are not UTF-8 are `MalformedDefinition`, not
    /// `SourceNotFound`: the file exists and was read.
    pub fn load_from_bytes(
        &self,
        content: &[u8],
        source: impl Into<PathBuf>,
        policy: InvalidTypePolicy,
    ) -> Result<StructureMetadata, MetadataError> {
        let source = source.into();
        let content = std::str::from_utf8(content).map_err(|err| {
            MetadataError::malformed(
                source.display().to_string(),
                format!("definition is not valid UTF-8 ({})", err),
            )
        })?;

        self.load_from_str(content, source, policy)
    }

    /// Parse a structure definition held in memory
    ///
    /// `source` is recorded on the result and used in error context only.
    pub fn load_from_str(
        &self,
        content: &str,
        source: impl Into<PathBuf>,
        policy: InvalidTypePolicy,
    ) -> Result<StructureMetadata, MetadataError> {
        let source = source.into();
        let context = source.display().to_string();

        let document = Document::parse(content)
            .map_err(|err| MetadataError::malformed(&context, err.to_string()))?;
        let root = document.root_element();

        let mut parts = StructureParts {
            source,
            ..Default::default()
        };

        for node in xml::elements(root) {
            match xml::name(node) {
                "key" => parts.key = xml::text(node),
                "view" => parts.view = Some(xml::text(node)),
                "controller" => parts.controller = Some(xml::text(node)),
                "internal" => {
                    parts.internal = xml::parse_bool(&xml::text(node), &context, "internal")?
                }
                "cacheLifetime" => {
                    parts.cache_lifetime = Some(self.parse_cache_lifetime(node, &context)?)
                }
                "meta" => parts.title = xml::localized(Some(node), "title"),
                "properties" => {
                    parts.properties = self.properties_parser.parse_properties(
                        node,
                        self.content_types.as_ref(),
                        policy,
                    )?
                }
                "tag" => {}
                other => tracing::debug!("Skipping <{}> in structure {}", other, context),
            }
        }
        parts.tags = xml::tags(root, &context)?;

        if parts.key.is_empty() {
            return Err(MetadataError::malformed(&context, "structure requires a <key>"));
        }

        tracing::info!(
            "Loaded structure '{}' with {} properties from {}",
            parts.key,
            parts.properties.len(),
            context
        );

        Ok(StructureMetadata::from_parts(parts))
    }

    fn parse_cache_lifetime(
        &self,
        node: Node<'_, '_>,
        context: &str,
    ) -> Result<CacheLifetime, MetadataError> {
        let kind = xml::required_attr(node, "type", context)?;
        let value = xml::text(node);

        let Some(kind) = CacheLifetimeType::parse(kind) else {
            return Err(MetadataError::unsupported_cache_lifetime(kind, value));
        };

        if !self.cache_lifetime_resolver.supports(kind, &value) {
            return Err(MetadataError::unsupported_cache_lifetime(kind.as_str(), value));
        }

        Ok(CacheLifetime::new(kind, value))
    }
}
