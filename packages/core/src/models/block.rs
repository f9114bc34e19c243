//! Block Property Types
//!
//! A block is a repeatable, polymorphic field. Each block instance selects one
//! of the block's components ("types"), and each component declares its own
//! property list, which may itself contain blocks.

use crate::models::localized::LocalizedText;
use crate::models::property::{find_property, Property, PropertyDescriptor};
use serde::Serialize;

/// Occurrence bounds of a block
///
/// `max = None` means unbounded. When both bounds are present `min <= max`
/// holds for every value produced by the parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurs {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl Occurs {
    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }

    /// Whether `count` block instances satisfy the bounds
    pub fn allows(&self, count: u32) -> bool {
        self.min.map_or(true, |min| count >= min) && self.max.map_or(true, |max| count <= max)
    }
}

/// One selectable sub-schema of a block
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockComponent {
    /// Component identifier (unique within the owning block)
    pub key: String,

    pub properties: Vec<Property>,

    pub title: LocalizedText,

    pub description: LocalizedText,
}

impl BlockComponent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            properties: Vec::new(),
            title: LocalizedText::new(),
            description: LocalizedText::new(),
        }
    }

    /// Title for `locale`, `None` if the component has no title in that locale
    pub fn title(&self, locale: &str) -> Option<&str> {
        self.title.get(locale)
    }

    /// Description for `locale`, `None` if none was defined
    pub fn description(&self, locale: &str) -> Option<&str> {
        self.description.get(locale)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        find_property(&self.properties, name)
    }
}

/// Block property with its ordered components
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockProperty {
    #[serde(flatten)]
    pub descriptor: PropertyDescriptor,

    /// Components in source order (drives the admin type selector)
    pub components: Vec<BlockComponent>,

    pub occurs: Occurs,

    /// Key of the component preselected for new block instances
    pub default_type: String,
}

impl BlockProperty {
    pub fn component(&self, key: &str) -> Option<&BlockComponent> {
        self.components.iter().find(|component| component.key == key)
    }

    pub fn default_component(&self) -> Option<&BlockComponent> {
        self.component(&self.default_type)
    }

    /// Position of the default component in source order
    pub fn default_component_index(&self) -> Option<usize> {
        self.components
            .iter()
            .position(|component| component.key == self.default_type)
    }

    pub fn component_keys(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|component| component.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_with(keys: &[&str], default: &str) -> BlockProperty {
        BlockProperty {
            descriptor: PropertyDescriptor::new("blocks", "block"),
            components: keys.iter().map(|key| BlockComponent::new(*key)).collect(),
            occurs: Occurs::default(),
            default_type: default.to_string(),
        }
    }

    #[test]
    fn test_default_component_index_follows_source_order() {
        let block = block_with(&["text", "image", "quote"], "image");

        assert_eq!(block.default_component_index(), Some(1));
        assert_eq!(block.default_component().map(|c| c.key.as_str()), Some("image"));
    }

    #[test]
    fn test_component_keys_keep_order() {
        let block = block_with(&["b", "a", "c"], "b");

        let keys: Vec<&str> = block.component_keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_occurs_allows() {
        let bounded = Occurs {
            min: Some(1),
            max: Some(3),
        };
        assert!(!bounded.allows(0));
        assert!(bounded.allows(1));
        assert!(bounded.allows(3));
        assert!(!bounded.allows(4));

        let unbounded = Occurs {
            min: Some(2),
            max: None,
        };
        assert!(unbounded.is_unbounded());
        assert!(unbounded.allows(1000));
        assert!(!unbounded.allows(1));
    }

    #[test]
    fn test_missing_title_is_none() {
        let mut component = BlockComponent::new("text");
        component.title.insert("de", "Text");

        assert_eq!(component.title("de"), Some("Text"));
        assert_eq!(component.title("en"), None);
        assert_eq!(component.description("de"), None);
    }
}
