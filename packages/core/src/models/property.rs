//! Property Descriptor Types
//!
//! A structure is an ordered list of [`Property`] values. Most properties are
//! plain typed fields ([`Property::Scalar`]); block properties
//! ([`Property::Block`]) own a list of components, each with its own property
//! list, which is what makes the model recursive.
//!
//! ## Example Definition
//!
//! ```xml
//! <property name="title" type="text_line" mandatory="true">
//!     <meta>
//!         <title lang="en">Title</title>
//!     </meta>
//!     <params>
//!         <param name="headline" value="true"/>
//!     </params>
//!     <tag name="contentspace.rlp.part" priority="1"/>
//! </property>
//! ```

use crate::metadata::expression::{ExpressionContext, ExpressionError, ExpressionEvaluator};
use crate::models::block::BlockProperty;
use crate::models::localized::LocalizedText;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Named tag attached to a property or structure
///
/// Tags are opaque to the loader; consumers (search indexing, resource locator
/// generation, ...) interpret them by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    /// Any further attributes on the tag element
    pub attributes: BTreeMap<String, String>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Value of a property parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ParamValue {
    /// Literal value (string or boolean)
    Scalar(Value),

    /// Collection of unnamed values
    List(Vec<ParamValue>),

    /// Collection of named parameters, in document order
    Map(Vec<Param>),

    /// Expression kept for deferred evaluation by the consumer
    Expression(String),
}

impl ParamValue {
    pub fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }

    /// Literal value of a scalar parameter
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Convert to a plain JSON value, evaluating deferred expressions
    ///
    /// The evaluator is only invoked for [`ParamValue::Expression`] entries;
    /// literal values are converted as-is.
    pub fn resolve(
        &self,
        evaluator: &dyn ExpressionEvaluator,
        context: &ExpressionContext,
    ) -> Result<Value, ExpressionError> {
        match self {
            Self::Scalar(value) => Ok(value.clone()),
            Self::List(items) => items
                .iter()
                .map(|item| item.resolve(evaluator, context))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Self::Map(params) => {
                let mut object = serde_json::Map::new();
                for param in params {
                    object.insert(param.name.clone(), param.value.resolve(evaluator, context)?);
                }
                Ok(Value::Object(object))
            }
            Self::Expression(expression) => evaluator.evaluate(expression, context),
        }
    }
}

/// Named parameter passed to a content type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    pub name: String,
    pub value: ParamValue,

    /// Localized titles (used by option-like params such as select values)
    #[serde(skip_serializing_if = "LocalizedText::is_empty")]
    pub title: LocalizedText,
}

impl Param {
    pub fn new(name: impl Into<String>, value: ParamValue) -> Self {
        Self {
            name: name.into(),
            value,
            title: LocalizedText::new(),
        }
    }
}

/// Definition of a single typed property
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Property name (unique among its siblings)
    pub name: String,

    /// Content type identifier (e.g., "text_line", "block")
    #[serde(rename = "type")]
    pub content_type: String,

    pub mandatory: bool,

    pub multilingual: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub colspan: Option<u8>,

    pub tags: Vec<Tag>,

    pub params: Vec<Param>,

    /// Expression deciding whether the field is shown in the admin form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_condition: Option<String>,

    /// Expression deciding whether the field is read-only in the admin form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_condition: Option<String>,

    pub title: LocalizedText,

    pub description: LocalizedText,
}

impl PropertyDescriptor {
    /// Create a descriptor with default flags (optional, multilingual)
    pub fn new(name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            mandatory: false,
            multilingual: true,
            colspan: None,
            tags: Vec::new(),
            params: Vec::new(),
            visible_condition: None,
            disabled_condition: None,
            title: LocalizedText::new(),
            description: LocalizedText::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name == name)
    }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.name == name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tag(name).is_some()
    }

    pub fn title(&self, locale: &str) -> Option<&str> {
        self.title.get(locale)
    }

    pub fn description(&self, locale: &str) -> Option<&str> {
        self.description.get(locale)
    }
}

/// A property of a structure or block component
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Property {
    Scalar(PropertyDescriptor),
    Block(BlockProperty),
}

impl Property {
    pub fn descriptor(&self) -> &PropertyDescriptor {
        match self {
            Self::Scalar(descriptor) => descriptor,
            Self::Block(block) => &block.descriptor,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor().name
    }

    pub fn content_type(&self) -> &str {
        &self.descriptor().content_type
    }

    pub fn is_mandatory(&self) -> bool {
        self.descriptor().mandatory
    }

    pub fn is_multilingual(&self) -> bool {
        self.descriptor().multilingual
    }

    pub fn as_block(&self) -> Option<&BlockProperty> {
        match self {
            Self::Block(block) => Some(block),
            Self::Scalar(_) => None,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }
}

/// Find a property by name in an ordered property list
pub(crate) fn find_property<'a>(properties: &'a [Property], name: &str) -> Option<&'a Property> {
    properties.iter().find(|property| property.name() == name)
}
