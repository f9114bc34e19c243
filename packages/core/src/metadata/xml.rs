//! XML node helpers shared by the structure and property parsers.

use crate::metadata::error::MetadataError;
use crate::models::{LocalizedText, Tag};
use roxmltree::Node;

/// Element children of `node`, skipping text and comments
pub(crate) fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

/// First element child with the given local name
pub(crate) fn child<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    elements(node).find(|child| child.tag_name().name() == name)
}

/// Element children with the given local name
pub(crate) fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    elements(node).filter(move |child| child.tag_name().name() == name)
}

pub(crate) fn name<'input>(node: Node<'_, 'input>) -> &'input str {
    node.tag_name().name()
}

/// Trimmed text content of an element, empty when it has none
pub(crate) fn text(node: Node<'_, '_>) -> String {
    node.text().map(str::trim).unwrap_or_default().to_string()
}

pub(crate) fn required_attr<'a>(
    node: Node<'a, '_>,
    attribute: &str,
    context: &str,
) -> Result<&'a str, MetadataError> {
    match node.attribute(attribute).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(MetadataError::malformed(
            context,
            format!("<{}> requires a '{}' attribute", name(node), attribute),
        )),
    }
}

pub(crate) fn parse_bool(value: &str, context: &str, field: &str) -> Result<bool, MetadataError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(MetadataError::malformed(
            context,
            format!("'{}' must be a boolean, got '{}'", field, other),
        )),
    }
}

pub(crate) fn bool_attr(
    node: Node<'_, '_>,
    attribute: &str,
    context: &str,
    default: bool,
) -> Result<bool, MetadataError> {
    node.attribute(attribute)
        .map_or(Ok(default), |value| parse_bool(value, context, attribute))
}

pub(crate) fn u32_attr(
    node: Node<'_, '_>,
    attribute: &str,
    context: &str,
) -> Result<Option<u32>, MetadataError> {
    let Some(value) = node.attribute(attribute).map(str::trim) else {
        return Ok(None);
    };
    value.parse::<u32>().map(Some).map_err(|_| {
        MetadataError::malformed(
            context,
            format!("'{}' must be a non-negative integer, got '{}'", attribute, value),
        )
    })
}

/// Collect `<element lang="..">text</element>` children into a locale map
pub(crate) fn localized(node: Option<Node<'_, '_>>, element: &str) -> LocalizedText {
    let Some(node) = node else {
        return LocalizedText::new();
    };

    elements(node)
        .filter(|child| name(*child) == element)
        .filter_map(|child| child.attribute("lang").map(|lang| (lang, text(child))))
        .collect()
}

/// Parse `<tag name=".." priority=".." ...>` children
pub(crate) fn tags(node: Node<'_, '_>, context: &str) -> Result<Vec<Tag>, MetadataError> {
    children(node, "tag")
        .map(|tag_node| {
            let mut tag = Tag::new(required_attr(tag_node, "name", context)?);

            for attribute in tag_node.attributes() {
                match attribute.name() {
                    "name" => {}
                    "priority" => {
                        let priority = attribute.value().trim().parse::<i64>().map_err(|_| {
                            MetadataError::malformed(
                                context,
                                format!(
                                    "priority of tag '{}' must be an integer, got '{}'",
                                    tag.name,
                                    attribute.value()
                                ),
                            )
                        })?;
                        tag.priority = Some(priority);
                    }
                    other => {
                        tag.attributes
                            .insert(other.to_string(), attribute.value().to_string());
                    }
                }
            }

            Ok(tag)
        })
        .collect()
}
