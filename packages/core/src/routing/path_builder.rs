//! Repository paths of custom-url routes.

use serde::{Deserialize, Serialize};

/// Builds the repository path under which custom-url routes of a webspace live
///
/// The default layout is `/cmf/<webspace>/custom-urls/routes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesPathBuilder {
    pub base: String,
    pub custom_urls: String,
    pub routes: String,
}

impl Default for RoutesPathBuilder {
    fn default() -> Self {
        Self {
            base: "cmf".to_string(),
            custom_urls: "custom-urls".to_string(),
            routes: "routes".to_string(),
        }
    }
}

impl RoutesPathBuilder {
    /// Routes path for a webspace
    pub fn routes_path(&self, webspace_key: &str) -> String {
        [
            self.base.as_str(),
            webspace_key,
            self.custom_urls.as_str(),
            self.routes.as_str(),
        ]
        .iter()
        .map(|segment| segment.trim_matches('/'))
        .filter(|segment| !segment.is_empty())
        .fold(String::new(), |mut path, segment| {
            path.push('/');
            path.push_str(segment);
            path
        })
    }
}

/// Path of `path` relative to `base_path`
///
/// Returns `None` when `path` is not inside `base_path`.
pub fn relativize_path(path: &str, base_path: &str) -> Option<String> {
    let base_path = base_path.trim_end_matches('/');
    let rest = path.strip_prefix(base_path)?;

    if rest.is_empty() {
        return Some(String::new());
    }
    rest.strip_prefix('/').map(str::to_string)
}
