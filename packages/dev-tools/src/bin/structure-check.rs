//! Structure Checker
//!
//! Loads one or more structure definition files and prints the parsed
//! metadata as JSON, or the load error for each file that fails.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin structure-check -- templates/default.xml templates/article.xml
//!
//! # Accept project-specific content types
//! STRUCTURE_CHECK_TYPES=location,snippet_selection cargo run --bin structure-check -- page.xml
//!
//! # Drop properties with unknown types instead of failing
//! STRUCTURE_INVALID_TYPES=ignore cargo run --bin structure-check -- page.xml
//! ```
//!
//! Log verbosity follows `RUST_LOG` (defaults to `info`).
//!
//! Exits non-zero if any file fails to load.

use anyhow::{bail, Context};
use contentspace_core::{
    ContentTypeManager, DefaultCacheLifetimeResolver, JsonExpressionEvaluator, LoaderConfig,
    PropertiesParser, StructureLoader,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Comma separated content types accepted on top of the defaults
const EXTRA_TYPES_ENV: &str = "STRUCTURE_CHECK_TYPES";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        bail!("usage: structure-check <structure.xml>...");
    }

    let extra_types: Vec<String> = std::env::var(EXTRA_TYPES_ENV)
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|content_type| !content_type.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if !extra_types.is_empty() {
        tracing::debug!("Extra content types: {}", extra_types.join(", "));
    }

    let loader = StructureLoader::new(
        Arc::new(DefaultCacheLifetimeResolver),
        PropertiesParser::new(Arc::new(JsonExpressionEvaluator)),
        Arc::new(ContentTypeManager::with_defaults().with_types(extra_types)),
        LoaderConfig::from_env(),
    );

    let mut failures = 0;
    for path in &paths {
        match loader.load(path) {
            Ok(structure) => {
                let json = serde_json::to_string_pretty(&structure)
                    .with_context(|| format!("Failed to serialize structure from {}", path))?;
                println!("{}", json);
            }
            Err(e) => {
                eprintln!("❌ {}: {}", path, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} structure(s) failed to load", failures, paths.len());
    }

    Ok(())
}
