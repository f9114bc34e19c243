//! Properties Parser
//!
//! Turns the children of a `<properties>` element into an ordered list of
//! [`Property`] values. `<block>` children are handed to the block parser,
//! which calls back into this parser for each component's own property list.
//!
//! ## Content type validation
//!
//! Every property's `type` must be known to the [`ContentTypeRegistry`]. An
//! unknown type either fails the parse with `UnknownType` or drops the
//! property, depending on the effective [`InvalidTypePolicy`]:
//!
//! ```xml
//! <property name="legacy" type="removed_type" onInvalid="ignore"/>
//! ```
//!
//! ## Parameters
//!
//! - `<param name="a" value="b"/>` - literal (`true`/`false` become booleans)
//! - `<param name="a" type="collection">...</param>` - nested map or list
//! - `<param name="a" expression="..."/>` - kept for deferred evaluation
//! - `<param name="a" type="collection" expression="..."/>` - evaluated now,
//!   since the result decides between list and map

use crate::metadata::block_parser::BlockParser;
use crate::metadata::config::InvalidTypePolicy;
use crate::metadata::content_types::ContentTypeRegistry;
use crate::metadata::error::MetadataError;
use crate::metadata::expression::{ExpressionContext, ExpressionEvaluator};
use crate::metadata::xml;
use crate::models::{Param, ParamValue, Property, PropertyDescriptor};
use roxmltree::Node;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Registry and policy in effect while parsing one structure
#[derive(Clone, Copy)]
pub(crate) struct ParseScope<'a> {
    pub content_types: &'a dyn ContentTypeRegistry,
    pub policy: InvalidTypePolicy,
}

/// Parser for property lists
pub struct PropertiesParser {
    expression_evaluator: Arc<dyn ExpressionEvaluator>,
}

impl PropertiesParser {
    /// Create a parser
    ///
    /// # Arguments
    ///
    /// * `expression_evaluator` - Used only for parameters whose shape depends
    ///   on an expression result
    pub fn new(expression_evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        Self {
            expression_evaluator,
        }
    }

    /// Parse the children of a `<properties>` element
    ///
    /// # Errors
    ///
    /// - `UnknownType`: Unregistered type and the effective policy is `Reject`
    /// - `DuplicateProperty`: Two siblings share a name
    /// - `MalformedDefinition`: Missing attributes or unexpected elements
    /// - Any block error from nested blocks
    pub fn parse_properties(
        &self,
        properties: Node<'_, '_>,
        content_types: &dyn ContentTypeRegistry,
        policy: InvalidTypePolicy,
    ) -> Result<Vec<Property>, MetadataError> {
        self.parse_list(
            properties,
            ParseScope {
                content_types,
                policy,
            },
        )
    }

    pub(crate) fn parse_list(
        &self,
        properties: Node<'_, '_>,
        scope: ParseScope<'_>,
    ) -> Result<Vec<Property>, MetadataError> {
        let mut parsed = Vec::new();
        let mut names = HashSet::new();

        for node in xml::elements(properties) {
            let property = match xml::name(node) {
                "property" => {
                    let is_block = xml::child(node, "types").is_some();
                    self.parse_property(node, is_block, scope)?
                }
                "block" => self.parse_property(node, true, scope)?,
                other => {
                    return Err(MetadataError::malformed(
                        "properties",
                        format!("unexpected element <{}>", other),
                    ))
                }
            };

            let Some(property) = property else {
                continue;
            };

            if !names.insert(property.name().to_string()) {
                return Err(MetadataError::duplicate_property(property.name()));
            }
            parsed.push(property);
        }

        Ok(parsed)
    }

    /// Parse one `<property>` or `<block>` element
    ///
    /// Returns `None` when the property was dropped by the invalid type policy.
    fn parse_property(
        &self,
        node: Node<'_, '_>,
        is_block: bool,
        scope: ParseScope<'_>,
    ) -> Result<Option<Property>, MetadataError> {
        let name = xml::required_attr(node, "name", "property")?;
        let context = format!("property '{}'", name);
        let content_type = if is_block {
            node.attribute("type").unwrap_or("block")
        } else {
            xml::required_attr(node, "type", &context)?
        };

        let policy = match node.attribute("onInvalid") {
            Some(value) => InvalidTypePolicy::parse(value).ok_or_else(|| {
                MetadataError::malformed(&context, format!("unknown onInvalid value '{}'", value))
            })?,
            None => scope.policy,
        };

        if !scope.content_types.has(content_type) {
            return match policy {
                InvalidTypePolicy::Ignore => {
                    tracing::debug!(
                        "Ignoring property '{}' with unregistered content type '{}'",
                        name,
                        content_type
                    );
                    Ok(None)
                }
                InvalidTypePolicy::Reject => Err(MetadataError::unknown_type(
                    name,
                    content_type,
                    scope.content_types.get_all(),
                )),
            };
        }

        let descriptor = self.parse_descriptor(node, name, content_type, is_block, &context)?;

        if is_block {
            BlockParser::new(self)
                .parse(node, descriptor, scope)
                .map(|block| Some(Property::Block(block)))
        } else {
            Ok(Some(Property::Scalar(descriptor)))
        }
    }

    fn parse_descriptor(
        &self,
        node: Node<'_, '_>,
        name: &str,
        content_type: &str,
        is_block: bool,
        context: &str,
    ) -> Result<PropertyDescriptor, MetadataError> {
        let mut descriptor = PropertyDescriptor::new(name, content_type);
        descriptor.mandatory = xml::bool_attr(node, "mandatory", context, false)?;
        descriptor.multilingual = xml::bool_attr(node, "multilingual", context, true)?;
        descriptor.visible_condition = node.attribute("visibleCondition").map(str::to_string);
        descriptor.disabled_condition = node.attribute("disabledCondition").map(str::to_string);
        descriptor.colspan = match xml::u32_attr(node, "colspan", context)? {
            Some(colspan) => Some(u8::try_from(colspan).map_err(|_| {
                MetadataError::malformed(context, format!("colspan {} is out of range", colspan))
            })?),
            None => None,
        };

        for child in xml::elements(node) {
            match xml::name(child) {
                "meta" => {
                    descriptor.title = xml::localized(Some(child), "title");
                    descriptor.description = xml::localized(Some(child), "info_text");
                }
                "params" => descriptor.params = self.parse_params(child, context)?,
                "tag" => {}
                "types" if is_block => {}
                other => {
                    return Err(MetadataError::malformed(
                        context,
                        format!("unexpected element <{}>", other),
                    ))
                }
            }
        }
        descriptor.tags = xml::tags(node, context)?;

        Ok(descriptor)
    }

    fn parse_params(
        &self,
        params: Node<'_, '_>,
        context: &str,
    ) -> Result<Vec<Param>, MetadataError> {
        xml::elements(params)
            .map(|node| match xml::name(node) {
                "param" => self.parse_param(node, context),
                other => Err(MetadataError::malformed(
                    context,
                    format!("unexpected element <{}> in <params>", other),
                )),
            })
            .collect()
    }

    fn parse_param(&self, node: Node<'_, '_>, context: &str) -> Result<Param, MetadataError> {
        let name = xml::required_attr(node, "name", context)?;
        let param_context = format!("{} param '{}'", context, name);

        let mut param = Param::new(name, self.parse_param_value(node, &param_context)?);
        param.title = xml::localized(xml::child(node, "meta"), "title");

        Ok(param)
    }

    fn parse_param_value(
        &self,
        node: Node<'_, '_>,
        context: &str,
    ) -> Result<ParamValue, MetadataError> {
        let kind = node.attribute("type").unwrap_or("string");
        let expression = match node.attribute("expression") {
            Some(expression) => Some(expression),
            None if kind == "expression" => node.attribute("value"),
            None => None,
        };

        match (kind, expression) {
            ("collection", Some(expression)) => self.evaluate_collection(expression, context),
            ("collection", None) => self.parse_collection(node, context),
            ("string" | "expression", Some(expression)) => {
                Ok(ParamValue::Expression(expression.to_string()))
            }
            ("string", None) => Ok(ParamValue::Scalar(literal(node.attribute("value")))),
            ("expression", None) => Err(MetadataError::malformed(
                context,
                "expression parameter requires a value",
            )),
            (other, _) => Err(MetadataError::malformed(
                context,
                format!("unknown parameter type '{}'", other),
            )),
        }
    }

    fn parse_collection(
        &self,
        node: Node<'_, '_>,
        context: &str,
    ) -> Result<ParamValue, MetadataError> {
        let mut items = Vec::new();
        for child in xml::elements(node) {
            match xml::name(child) {
                "param" => items.push(child),
                "meta" => {}
                other => {
                    return Err(MetadataError::malformed(
                        context,
                        format!("unexpected element <{}> in collection", other),
                    ))
                }
            }
        }

        let named = items.iter().filter(|item| item.has_attribute("name")).count();
        if named == items.len() {
            items
                .into_iter()
                .map(|item| self.parse_param(item, context))
                .collect::<Result<Vec<_>, _>>()
                .map(ParamValue::Map)
        } else if named == 0 {
            items
                .into_iter()
                .map(|item| self.parse_param_value(item, context))
                .collect::<Result<Vec<_>, _>>()
                .map(ParamValue::List)
        } else {
            Err(MetadataError::malformed(
                context,
                "collection mixes named and unnamed entries",
            ))
        }
    }

    fn evaluate_collection(
        &self,
        expression: &str,
        context: &str,
    ) -> Result<ParamValue, MetadataError> {
        let value = self
            .expression_evaluator
            .evaluate(expression, &ExpressionContext::default())
            .map_err(|err| MetadataError::malformed(context, err.to_string()))?;

        match value {
            Value::Array(_) | Value::Object(_) => Ok(json_to_param_value(value)),
            other => Err(MetadataError::malformed(
                context,
                format!("collection expression must yield a list or map, got {}", other),
            )),
        }
    }
}

fn literal(value: Option<&str>) -> Value {
    match value {
        None => Value::Null,
        Some("true") => Value::Bool(true),
        Some("false") => Value::Bool(false),
        Some(text) => Value::String(text.to_string()),
    }
}

fn json_to_param_value(value: Value) -> ParamValue {
    match value {
        Value::Array(items) => {
            ParamValue::List(items.into_iter().map(json_to_param_value).collect())
        }
        Value::Object(entries) => ParamValue::Map(
            entries
                .into_iter()
                .map(|(name, value)| Param::new(name, json_to_param_value(value)))
                .collect(),
        ),
        scalar => ParamValue::Scalar(scalar),
    }
}
