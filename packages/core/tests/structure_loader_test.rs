//! Integration tests for StructureLoader
//!
//! Tests cover:
//! - Full template loading (scalars, params, tags, meta)
//! - Internal flag and cron cache lifetimes
//! - Block components with and without meta
//! - Invalid type policy (global and per-property override)
//! - Loader error paths (missing file, non-UTF-8 file, malformed XML, cache lifetime)

use anyhow::Result;
use contentspace_core::{
    CacheLifetimeResolver, CacheLifetimeType, ContentTypeManager, ExpressionContext,
    ExpressionError, ExpressionEvaluator, InvalidTypePolicy, LoaderConfig, MetadataError,
    ParamValue, PropertiesParser, Property, StructureLoader,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Resolver that answers every question the same way
struct FixedCacheLifetimeResolver(bool);

impl CacheLifetimeResolver for FixedCacheLifetimeResolver {
    fn supports(&self, _kind: CacheLifetimeType, _value: &str) -> bool {
        self.0
    }
}

/// Evaluator that counts calls and always yields `["de", "en"]`
#[derive(Default)]
struct RecordingEvaluator {
    calls: AtomicUsize,
}

impl ExpressionEvaluator for RecordingEvaluator {
    fn evaluate(
        &self,
        _expression: &str,
        _context: &ExpressionContext,
    ) -> Result<Value, ExpressionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!(["de", "en"]))
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Test helper: loader with default types and a permissive cache resolver
fn create_loader(policy: InvalidTypePolicy) -> (StructureLoader, Arc<RecordingEvaluator>) {
    create_loader_with_resolver(policy, true)
}

fn create_loader_with_resolver(
    policy: InvalidTypePolicy,
    supports_cache_lifetime: bool,
) -> (StructureLoader, Arc<RecordingEvaluator>) {
    let evaluator = Arc::new(RecordingEvaluator::default());
    let loader = StructureLoader::new(
        Arc::new(FixedCacheLifetimeResolver(supports_cache_lifetime)),
        PropertiesParser::new(evaluator.clone()),
        Arc::new(ContentTypeManager::with_defaults()),
        LoaderConfig::default().with_invalid_type_policy(policy),
    );

    (loader, evaluator)
}

// =========================================================================
// Template Loading Tests
// =========================================================================

#[test]
fn test_load_template() -> Result<()> {
    let (loader, evaluator) = create_loader(InvalidTypePolicy::Reject);

    let structure = loader.load(fixture("template.xml"))?;

    assert_eq!(structure.key(), "template");
    assert_eq!(structure.view(), Some("page.html.twig"));
    assert_eq!(structure.controller(), Some("PageController::indexAction"));
    assert!(!structure.is_internal());
    assert_eq!(structure.source(), fixture("template.xml").as_path());

    let cache_lifetime = structure.cache_lifetime().expect("cache lifetime");
    assert_eq!(cache_lifetime.kind, CacheLifetimeType::Seconds);
    assert_eq!(cache_lifetime.value, "2400");

    assert_eq!(structure.title("de"), Some("Das ist das Template 1"));
    assert_eq!(structure.title("en"), Some("That's the template 1"));
    assert_eq!(structure.title("fr"), None);

    assert!(structure.has_tag("some.random.structure.tag"));
    let tag = &structure.tags()[0];
    assert_eq!(tag.attribute("foo"), Some("bar"));
    assert_eq!(tag.attribute("bar"), Some("foo"));
    assert_eq!(tag.priority, None);

    let names: Vec<&str> = structure.property_names().collect();
    assert_eq!(names, vec!["title", "url", "article", "pages", "images"]);

    // No collection expression in the template, so nothing evaluated at load
    assert_eq!(evaluator.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn test_load_template_property_details() -> Result<()> {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);
    let structure = loader.load(fixture("template.xml"))?;

    let title = structure.property("title").expect("title");
    assert!(matches!(title, Property::Scalar(_)));
    assert_eq!(title.content_type(), "text_line");
    assert!(title.is_mandatory());
    assert!(title.is_multilingual());
    let descriptor = title.descriptor();
    assert_eq!(descriptor.colspan, Some(6));
    assert_eq!(descriptor.title("de"), Some("Titel"));
    assert_eq!(descriptor.description("en"), Some("Title-Info-EN"));
    assert_eq!(descriptor.tag("contentspace.node.title").and_then(|tag| tag.priority), Some(10));
    assert_eq!(
        descriptor.param("max_length").map(|param| &param.value),
        Some(&ParamValue::Scalar(json!("255")))
    );

    let url = structure.property("url").expect("url");
    assert!(url.is_mandatory());
    assert!(!url.is_multilingual());

    let article = structure.property("article").expect("article");
    assert_eq!(article.descriptor().visible_condition.as_deref(), Some("title != null"));
    assert_eq!(article.descriptor().disabled_condition, None);

    let pages = structure.property("pages").expect("pages");
    assert_eq!(pages.descriptor().disabled_condition.as_deref(), Some("url == null"));

    let tagged: Vec<&str> = structure
        .properties_by_tag("contentspace.node.title")
        .map(|property| property.name())
        .collect();
    assert_eq!(tagged, vec!["title", "article"]);
    Ok(())
}

#[test]
fn test_load_template_params() -> Result<()> {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);
    let structure = loader.load(fixture("template.xml"))?;
    let pages = structure.property("pages").expect("pages").descriptor();

    let ParamValue::Map(properties) = &pages.param("properties").expect("properties").value else {
        panic!("properties should be a named collection");
    };
    let names: Vec<&str> = properties.iter().map(|param| param.name.as_str()).collect();
    assert_eq!(names, vec!["title", "article"]);

    let present_as = pages.param("present_as").expect("present_as");
    let ParamValue::Map(options) = &present_as.value else {
        panic!("present_as should be a named collection");
    };
    assert_eq!(options[0].name, "two");
    assert_eq!(options[0].title.get("en"), Some("Two columns"));
    assert_eq!(options[1].value, ParamValue::Scalar(Value::Null));

    let display_options = pages.param("display_options").expect("display_options");
    let ParamValue::Map(flags) = &display_options.value else {
        panic!("display_options should be a named collection");
    };
    assert_eq!(flags[0].value, ParamValue::Scalar(json!(true)));
    assert_eq!(flags[1].value, ParamValue::Scalar(json!(false)));

    assert_eq!(
        pages.param("locale").map(|param| &param.value),
        Some(&ParamValue::Expression("request.locale".to_string()))
    );
    Ok(())
}

#[test]
fn test_load_internal() -> Result<()> {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);

    let structure = loader.load(fixture("template_load_internal.xml"))?;

    assert!(structure.is_internal());
    let cache_lifetime = structure.cache_lifetime().expect("cache lifetime");
    assert_eq!(cache_lifetime.kind, CacheLifetimeType::Expression);
    assert_eq!(cache_lifetime.value, "0 0 * * *");
    Ok(())
}

// =========================================================================
// Block Tests
// =========================================================================

#[test]
fn test_load_block_types() -> Result<()> {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);

    let structure = loader.load(fixture("template_block_types.xml"))?;
    let block = structure
        .property("block1")
        .and_then(Property::as_block)
        .expect("block1 should be a block");

    assert_eq!(block.occurs.min, Some(2));
    assert_eq!(block.occurs.max, Some(10));
    assert_eq!(block.default_type, "default");
    assert_eq!(block.default_component_index(), Some(0));
    assert_eq!(block.component_keys().collect::<Vec<_>>(), vec!["default", "test"]);

    let default = block.component("default").expect("default component");
    assert_eq!(default.title("de"), Some("Default DE"));
    assert_eq!(default.title("en"), Some("Default EN"));
    assert_eq!(default.description("en"), None);
    assert_eq!(default.properties.len(), 2);

    let test = block.component("test").expect("test component");
    assert_eq!(test.title("de"), Some("Test DE"));
    assert_eq!(test.title("en"), Some("Test EN"));
    assert_eq!(test.description("de"), Some("Info Block1 DE"));
    assert_eq!(test.description("en"), Some("Info Block1 EN"));

    let inner = test
        .property("inner")
        .and_then(Property::as_block)
        .expect("nested block");
    assert!(inner.occurs.is_unbounded());
    assert_eq!(inner.occurs.min, Some(1));
    assert_eq!(inner.default_type, "link");
    Ok(())
}

#[test]
fn test_load_block_type_without_meta() -> Result<()> {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);

    let structure = loader.load(fixture("template_block_type_without_meta.xml"))?;
    let block = structure
        .property("block1")
        .and_then(Property::as_block)
        .expect("block1 should be a block");

    assert_eq!(block.occurs.min, Some(1));
    assert_eq!(block.occurs.max, Some(1));
    let component = block.default_component().expect("default component");
    assert_eq!(component.key, "default");
    assert!(component.title.is_empty());
    assert!(component.description.is_empty());
    Ok(())
}

// =========================================================================
// Invalid Type Policy Tests
// =========================================================================

#[test]
fn test_invalid_type_ignored_per_property() -> Result<()> {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);

    let structure = loader.load(fixture("template_with_invalid_ignore.xml"))?;

    let names: Vec<&str> = structure.property_names().collect();
    assert_eq!(names, vec!["title", "url", "block1"]);

    let block = structure.property("block1").and_then(Property::as_block).expect("block");
    let component = block.component("default").expect("default component");
    assert!(component.property("legacy").is_none());
    assert!(component.property("title").is_some());
    Ok(())
}

#[test]
fn test_invalid_type_rejected() {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);

    let err = loader
        .load(fixture("template_without_invalid_ignore.xml"))
        .unwrap_err();

    match err {
        MetadataError::UnknownType {
            property,
            content_type,
            available,
        } => {
            assert_eq!(property, "legacy");
            assert_eq!(content_type, "legacy_gallery");
            assert!(available.contains(&"text_line".to_string()));
        }
        other => panic!("Expected UnknownType, got {:?}", other),
    }
}

#[test]
fn test_invalid_type_ignored_by_policy() -> Result<()> {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);

    let structure = loader.load_with_policy(
        fixture("template_without_invalid_ignore.xml"),
        InvalidTypePolicy::Ignore,
    )?;

    assert_eq!(structure.property_names().collect::<Vec<_>>(), vec!["title"]);
    Ok(())
}

#[test]
fn test_configured_policy_applies_to_load() -> Result<()> {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Ignore);

    assert_eq!(loader.config().invalid_type_policy, InvalidTypePolicy::Ignore);
    let structure = loader.load(fixture("template_without_invalid_ignore.xml"))?;

    assert!(!structure.has_property("legacy"));
    Ok(())
}

// =========================================================================
// Error Path Tests
// =========================================================================

#[test]
fn test_missing_source() {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);

    let err = loader.load(fixture("does_not_exist.xml")).unwrap_err();

    assert!(matches!(err, MetadataError::SourceNotFound { .. }));
    assert!(err.to_string().contains("does_not_exist.xml"));
}

#[test]
fn test_non_utf8_source_is_malformed() -> Result<()> {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("latin1.xml");
    // ISO-8859-1 "ü" (0xFC) inside the title
    let mut content = b"<template><key>latin1</key><meta><title lang=\"de\">Gr".to_vec();
    content.push(0xFC);
    content.extend_from_slice(b"n</title></meta></template>");
    std::fs::write(&path, content)?;

    let err = loader.load(&path).unwrap_err();

    assert!(
        matches!(err, MetadataError::MalformedDefinition { .. }),
        "Existing file should not be reported as missing, got {:?}",
        err
    );
    assert!(err.to_string().contains("UTF-8"));
    Ok(())
}

#[test]
fn test_malformed_xml() {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);

    let err = loader
        .load_from_str("<template><key>broken</template>", "inline.xml", InvalidTypePolicy::Reject)
        .unwrap_err();

    assert!(matches!(err, MetadataError::MalformedDefinition { .. }));
}

#[test]
fn test_missing_key() {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);

    let err = loader
        .load_from_str(
            "<template><properties/></template>",
            "inline.xml",
            InvalidTypePolicy::Reject,
        )
        .unwrap_err();

    assert!(matches!(err, MetadataError::MalformedDefinition { .. }));
}

#[test]
fn test_unsupported_cache_lifetime() {
    let (loader, _evaluator) = create_loader_with_resolver(InvalidTypePolicy::Reject, false);

    let err = loader.load(fixture("template.xml")).unwrap_err();

    match err {
        MetadataError::UnsupportedCacheLifetime { kind, value } => {
            assert_eq!(kind, "seconds");
            assert_eq!(value, "2400");
        }
        other => panic!("Expected UnsupportedCacheLifetime, got {:?}", other),
    }
}

#[test]
fn test_unknown_cache_lifetime_type() {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);

    let err = loader
        .load_from_str(
            r#"<template><key>t</key><cacheLifetime type="minutes">5</cacheLifetime></template>"#,
            "inline.xml",
            InvalidTypePolicy::Reject,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        MetadataError::UnsupportedCacheLifetime { ref kind, .. } if kind == "minutes"
    ));
}

#[test]
fn test_structure_without_cache_lifetime() -> Result<()> {
    let (loader, _evaluator) = create_loader_with_resolver(InvalidTypePolicy::Reject, false);

    let structure = loader.load(fixture("template_block_type_without_meta.xml"))?;

    assert!(structure.cache_lifetime().is_none());
    assert!(structure.view().is_none());
    Ok(())
}

#[test]
fn test_collection_expression_evaluated_at_load() -> Result<()> {
    let (loader, evaluator) = create_loader(InvalidTypePolicy::Reject);

    let structure = loader.load_from_str(
        r#"<template>
            <key>t</key>
            <properties>
                <property name="locale" type="single_select">
                    <params>
                        <param name="values" type="collection" expression="locales"/>
                    </params>
                </property>
            </properties>
        </template>"#,
        "inline.xml",
        InvalidTypePolicy::Reject,
    )?;

    assert_eq!(evaluator.calls.load(Ordering::SeqCst), 1);
    let values = &structure
        .property("locale")
        .and_then(|property| property.descriptor().param("values"))
        .expect("values param")
        .value;
    assert_eq!(
        values,
        &ParamValue::List(vec![
            ParamValue::Scalar(json!("de")),
            ParamValue::Scalar(json!("en")),
        ])
    );
    Ok(())
}

#[test]
fn test_structure_serializes_to_json() -> Result<()> {
    let (loader, _evaluator) = create_loader(InvalidTypePolicy::Reject);
    let structure = loader.load(fixture("template_block_types.xml"))?;

    let value = serde_json::to_value(&structure)?;

    assert_eq!(value["key"], json!("template_block_types"));
    assert_eq!(value["cacheLifetime"], json!({"type": "seconds", "value": "2400"}));
    assert_eq!(value["properties"][1]["kind"], json!("block"));
    assert_eq!(value["properties"][1]["name"], json!("block1"));
    assert_eq!(value["properties"][1]["defaultType"], json!("default"));
    Ok(())
}
