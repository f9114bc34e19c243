//! Custom-URL Route Provider
//!
//! Decides per request whether a custom url is served, redirected from a
//! history alias, or not routed at all.
//!
//! ## Decision flow
//!
//! 1. No route document or no localization → `NoRoute`
//! 2. History route:
//!    - live route's custom url is not a redirect → `HistoryRedirect` to the
//!      live route's url
//!    - otherwise continue with the live route's custom url, so a redirect
//!      custom url does not produce a double redirect
//! 3. Custom url missing, unpublished, or its target page not published →
//!    `NoRoute`
//! 4. Otherwise → `DirectRoute` at the decoded request path
//!
//! Resolution takes `&self` and touches no shared state, so one provider can
//! serve concurrent requests.

use crate::models::{CustomUrlDocument, RouteDocument, RouteTarget};
use crate::routing::path_builder::{relativize_path, RoutesPathBuilder};
use crate::routing::route::{
    CustomUrlRouteDecision, RequestAttributes, RouteRequest, RouteResolution,
};

/// Maximum number of history routes followed before giving up
pub const MAX_HISTORY_DEPTH: usize = 8;

/// Resolves custom-url routes from request attributes
#[derive(Debug, Clone)]
pub struct CustomUrlRouteProvider {
    path_builder: RoutesPathBuilder,
    environment: String,
}

impl CustomUrlRouteProvider {
    /// Create a new CustomUrlRouteProvider
    ///
    /// # Arguments
    ///
    /// * `path_builder` - Layout of the route repository paths
    /// * `environment` - Environment name bound to direct routes (e.g. "prod")
    pub fn new(path_builder: RoutesPathBuilder, environment: impl Into<String>) -> Self {
        Self {
            path_builder,
            environment: environment.into(),
        }
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Resolve the route for one request
    ///
    /// Never fails: absence of a valid route is `CustomUrlRouteDecision::NoRoute`.
    pub fn resolve(
        &self,
        request: &RouteRequest,
        attributes: &RequestAttributes,
    ) -> RouteResolution {
        let (Some(route_document), Some(_)) = (
            attributes.route_document.as_ref(),
            attributes.localization.as_ref(),
        ) else {
            return RouteResolution::no_route();
        };

        let mut custom_url = attributes.custom_url.as_ref();

        if route_document.is_history() {
            let Some(live_route) = follow_history(route_document) else {
                return RouteResolution::no_route();
            };
            let Some(live_custom_url) = live_route.target_custom_url() else {
                tracing::warn!(
                    "Route '{}' does not point at a custom url, no route",
                    live_route.path
                );
                return RouteResolution::no_route();
            };

            if !live_custom_url.redirect {
                return self.history_redirect(request, live_route, &attributes.webspace.key);
            }

            custom_url = Some(live_custom_url);
        }

        let Some(custom_url) = custom_url.filter(|custom_url| is_routable(custom_url)) else {
            return RouteResolution::no_route();
        };

        let path = decode_path_info(&request.path_info);
        tracing::debug!("Custom url '{}' routed at '{}'", custom_url.title, path);

        RouteResolution::named(CustomUrlRouteDecision::DirectRoute {
            path,
            custom_url: custom_url.clone(),
            webspace: attributes.webspace.clone(),
            environment: self.environment.clone(),
        })
    }

    fn history_redirect(
        &self,
        request: &RouteRequest,
        live_route: &RouteDocument,
        webspace_key: &str,
    ) -> RouteResolution {
        let routes_path = self.path_builder.routes_path(webspace_key);
        let Some(resource_segment) = relativize_path(&live_route.path, &routes_path) else {
            tracing::warn!(
                "Route '{}' is outside of '{}', no route",
                live_route.path,
                routes_path
            );
            return RouteResolution::no_route();
        };

        let url = format!("{}://{}", request.scheme, resource_segment);
        let path = decode_path_info(&request.path_info);
        tracing::debug!("History route '{}' redirects to '{}'", path, url);

        RouteResolution::named(CustomUrlRouteDecision::HistoryRedirect { path, url })
    }
}

/// Follow history routes to the live route they point at
fn follow_history(route: &RouteDocument) -> Option<&RouteDocument> {
    let mut current = route;

    for _ in 0..MAX_HISTORY_DEPTH {
        match &current.target {
            RouteTarget::Route(target) if target.is_history() => current = target.as_ref(),
            RouteTarget::Route(target) => return Some(target.as_ref()),
            RouteTarget::CustomUrl(_) => {
                tracing::warn!(
                    "History route '{}' points at a custom url instead of a route, no route",
                    current.path
                );
                return None;
            }
        }
    }

    tracing::warn!(
        "History route '{}' exceeds {} hops, no route",
        route.path,
        MAX_HISTORY_DEPTH
    );
    None
}

/// Published, and its target page (if any) is published too
fn is_routable(custom_url: &CustomUrlDocument) -> bool {
    custom_url.published
        && custom_url
            .target_document
            .as_ref()
            .map_or(true, |target| target.is_published())
}

/// Percent-decode the request path exactly once
///
/// The web server encodes the path and the framework does not decode it
/// before routing. `+` is left untouched; invalid UTF-8 is replaced.
pub fn decode_path_info(path_info: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(path_info.as_bytes())).into_owned()
}
