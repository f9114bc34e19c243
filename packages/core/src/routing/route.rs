//! Route decision types produced by the custom-url route provider.

use crate::models::{CustomUrlDocument, Localization, RouteDocument, Webspace};
use serde::Serialize;
use uuid::Uuid;

/// Prefix of generated route names
pub const ROUTE_NAME_PREFIX: &str = "custom_url_route_";

/// Incoming request data needed for route resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    /// `http` or `https`
    pub scheme: String,

    /// Path as received, possibly still percent-encoded
    pub path_info: String,
}

impl RouteRequest {
    pub fn new(scheme: impl Into<String>, path_info: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            path_info: path_info.into(),
        }
    }
}

/// Request attributes resolved by the request analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestAttributes {
    pub route_document: Option<RouteDocument>,
    pub custom_url: Option<CustomUrlDocument>,
    pub localization: Option<Localization>,
    pub webspace: Webspace,
}

impl RequestAttributes {
    pub fn new(webspace: Webspace) -> Self {
        Self {
            route_document: None,
            custom_url: None,
            localization: None,
            webspace,
        }
    }

    pub fn with_route_document(mut self, route_document: RouteDocument) -> Self {
        self.route_document = Some(route_document);
        self
    }

    pub fn with_custom_url(mut self, custom_url: CustomUrlDocument) -> Self {
        self.custom_url = Some(custom_url);
        self
    }

    pub fn with_localization(mut self, localization: Localization) -> Self {
        self.localization = Some(localization);
        self
    }
}

/// Outcome of resolving a custom-url request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CustomUrlRouteDecision {
    /// Nothing to serve; not an error
    NoRoute,

    /// Serve the custom url at the decoded request path
    #[serde(rename_all = "camelCase")]
    DirectRoute {
        path: String,
        custom_url: CustomUrlDocument,
        webspace: Webspace,
        environment: String,
    },

    /// Permanently redirect a former alias to the current one
    HistoryRedirect { path: String, url: String },
}

impl CustomUrlRouteDecision {
    pub fn is_no_route(&self) -> bool {
        matches!(self, Self::NoRoute)
    }

    /// Request path the route is bound to
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::NoRoute => None,
            Self::DirectRoute { path, .. } | Self::HistoryRedirect { path, .. } => {
                Some(path.as_str())
            }
        }
    }
}

/// Decision of one resolution call together with its generated route name
///
/// Names are only meaningful within the resolution that produced them; a name
/// from another call never resolves here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResolution {
    name: Option<String>,
    decision: CustomUrlRouteDecision,
}

impl RouteResolution {
    pub(crate) fn no_route() -> Self {
        Self {
            name: None,
            decision: CustomUrlRouteDecision::NoRoute,
        }
    }

    /// Wrap a route decision under a freshly generated name
    pub(crate) fn named(decision: CustomUrlRouteDecision) -> Self {
        Self {
            name: Some(generate_route_name()),
            decision,
        }
    }

    pub fn decision(&self) -> &CustomUrlRouteDecision {
        &self.decision
    }

    pub fn into_decision(self) -> CustomUrlRouteDecision {
        self.decision
    }

    /// Name of the produced route, `None` for `NoRoute`
    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Look up a route produced by this resolution
    pub fn route_by_name(&self, name: &str) -> Option<&CustomUrlRouteDecision> {
        match &self.name {
            Some(own) if own == name => Some(&self.decision),
            _ => None,
        }
    }
}

/// Collision-resistant route name, safe to call concurrently
pub fn generate_route_name() -> String {
    format!("{}{}", ROUTE_NAME_PREFIX, Uuid::new_v4().simple())
}
