//! Custom-URL Documents
//!
//! Read-only views of the documents the custom-url route provider inspects.
//! They are resolved externally (document manager, request analyzer) and
//! handed in per request; routing never mutates them.
//!
//! ## Route chain
//!
//! ```text
//! history route ──target──▶ live route ──target──▶ custom url ──target──▶ page
//! ```

use serde::{Deserialize, Serialize};

/// Publication state of a content document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStage {
    Test,
    Published,
}

/// Content document a custom url points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDocument {
    pub uuid: String,
    pub workflow_stage: WorkflowStage,
}

impl TargetDocument {
    pub fn new(uuid: impl Into<String>, workflow_stage: WorkflowStage) -> Self {
        Self {
            uuid: uuid.into(),
            workflow_stage,
        }
    }

    pub fn is_published(&self) -> bool {
        self.workflow_stage == WorkflowStage::Published
    }
}

/// User-defined alias resolving to a target document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomUrlDocument {
    pub title: String,
    pub published: bool,

    /// Redirect custom urls answer with a redirect to their target
    pub redirect: bool,

    pub target_document: Option<TargetDocument>,
}

impl CustomUrlDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            published: false,
            redirect: false,
            target_document: None,
        }
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn redirect(mut self, redirect: bool) -> Self {
        self.redirect = redirect;
        self
    }

    pub fn with_target(mut self, target: TargetDocument) -> Self {
        self.target_document = Some(target);
        self
    }
}

/// What a route document points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "document", rename_all = "camelCase")]
pub enum RouteTarget {
    /// History routes point at another route
    Route(Box<RouteDocument>),

    CustomUrl(CustomUrlDocument),
}

/// Stored route of a custom url
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDocument {
    /// Repository path, e.g. `/cmf/example/custom-urls/routes/example.org/summer`
    pub path: String,

    /// History routes are former aliases kept for redirects
    pub history: bool,

    pub target: RouteTarget,
}

impl RouteDocument {
    /// Live route pointing at a custom url
    pub fn live(path: impl Into<String>, custom_url: CustomUrlDocument) -> Self {
        Self {
            path: path.into(),
            history: false,
            target: RouteTarget::CustomUrl(custom_url),
        }
    }

    /// History route pointing at a newer route
    pub fn history(path: impl Into<String>, target: RouteDocument) -> Self {
        Self {
            path: path.into(),
            history: true,
            target: RouteTarget::Route(Box::new(target)),
        }
    }

    pub fn is_history(&self) -> bool {
        self.history
    }

    pub fn target_route(&self) -> Option<&RouteDocument> {
        match &self.target {
            RouteTarget::Route(route) => Some(route),
            RouteTarget::CustomUrl(_) => None,
        }
    }

    pub fn target_custom_url(&self) -> Option<&CustomUrlDocument> {
        match &self.target {
            RouteTarget::CustomUrl(custom_url) => Some(custom_url),
            RouteTarget::Route(_) => None,
        }
    }
}

/// Webspace the request was matched to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webspace {
    pub key: String,
}

impl Webspace {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Localization the request was matched to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localization {
    pub locale: String,
}

impl Localization {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }
}
