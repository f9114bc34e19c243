//! Block Component Parser
//!
//! Parses a `<block>` element into a [`BlockProperty`]:
//!
//! ```xml
//! <block name="blocks" default-type="text" minOccurs="1" maxOccurs="5">
//!     <types>
//!         <type name="text">
//!             <meta>
//!                 <title lang="en">Text</title>
//!                 <info_text lang="en">Plain text block</info_text>
//!             </meta>
//!             <properties>
//!                 <property name="content" type="text_editor"/>
//!             </properties>
//!         </type>
//!     </types>
//! </block>
//! ```
//!
//! Component property lists go back through the [`PropertiesParser`], so
//! blocks nest to any depth.

use crate::metadata::error::MetadataError;
use crate::metadata::properties_parser::{ParseScope, PropertiesParser};
use crate::metadata::xml;
use crate::models::{BlockComponent, BlockProperty, Occurs, PropertyDescriptor};
use roxmltree::Node;

/// `maxOccurs` value meaning "no upper bound"
const UNBOUNDED: &str = "unbounded";

pub(crate) struct BlockParser<'p> {
    properties: &'p PropertiesParser,
}

impl<'p> BlockParser<'p> {
    pub(crate) fn new(properties: &'p PropertiesParser) -> Self {
        Self { properties }
    }

    /// Parse components, occurrence bounds and default component of a block
    ///
    /// # Errors
    ///
    /// - `MalformedDefinition`: No `<types>` element or no components
    /// - `DuplicateComponent`: Two components share a key
    /// - `InvalidDefaultComponent`: `default-type` names no component
    /// - `InvalidOccursRange`: `minOccurs` greater than `maxOccurs`
    pub(crate) fn parse(
        &self,
        node: Node<'_, '_>,
        descriptor: PropertyDescriptor,
        scope: ParseScope<'_>,
    ) -> Result<BlockProperty, MetadataError> {
        let context = format!("block '{}'", descriptor.name);
        let occurs = parse_occurs(node, &descriptor.name, &context)?;

        let types = xml::child(node, "types")
            .ok_or_else(|| MetadataError::malformed(&context, "block requires a <types> element"))?;

        let mut components: Vec<BlockComponent> = Vec::new();
        for type_node in xml::elements(types) {
            if xml::name(type_node) != "type" {
                return Err(MetadataError::malformed(
                    &context,
                    format!("unexpected element <{}> in <types>", xml::name(type_node)),
                ));
            }

            let component = self.parse_component(type_node, &context, scope)?;
            if components.iter().any(|existing| existing.key == component.key) {
                return Err(MetadataError::duplicate_component(
                    &descriptor.name,
                    component.key,
                ));
            }
            components.push(component);
        }

        let Some(first) = components.first() else {
            return Err(MetadataError::malformed(
                &context,
                "block requires at least one component",
            ));
        };

        let default_type = match node.attribute("default-type") {
            Some(default_type) => {
                if !components.iter().any(|component| component.key == default_type) {
                    return Err(MetadataError::invalid_default_component(
                        &descriptor.name,
                        default_type,
                    ));
                }
                default_type.to_string()
            }
            None => first.key.clone(),
        };

        tracing::debug!(
            "Parsed block '{}' with {} components (default '{}')",
            descriptor.name,
            components.len(),
            default_type
        );

        Ok(BlockProperty {
            descriptor,
            components,
            occurs,
            default_type,
        })
    }

    fn parse_component(
        &self,
        node: Node<'_, '_>,
        context: &str,
        scope: ParseScope<'_>,
    ) -> Result<BlockComponent, MetadataError> {
        let mut component = BlockComponent::new(xml::required_attr(node, "name", context)?);

        let meta = xml::child(node, "meta");
        component.title = xml::localized(meta, "title");
        component.description = xml::localized(meta, "info_text");

        if let Some(properties) = xml::child(node, "properties") {
            component.properties = self.properties.parse_list(properties, scope)?;
        }

        Ok(component)
    }
}

fn parse_occurs(node: Node<'_, '_>, block: &str, context: &str) -> Result<Occurs, MetadataError> {
    let min = xml::u32_attr(node, "minOccurs", context)?;
    let max = match node.attribute("maxOccurs").map(str::trim) {
        Some(UNBOUNDED) => None,
        _ => xml::u32_attr(node, "maxOccurs", context)?,
    };

    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(MetadataError::invalid_occurs_range(block, min, max));
        }
    }

    Ok(Occurs { min, max })
}
