//! Custom-URL Routing
//!
//! - `CustomUrlRouteProvider` - Per-request route decision
//! - `RouteResolution` / `CustomUrlRouteDecision` - Decision with name-scoped lookup
//! - `RoutesPathBuilder` - Repository layout of custom-url routes

pub mod custom_url_route_provider;
pub mod path_builder;
pub mod route;

pub use custom_url_route_provider::{decode_path_info, CustomUrlRouteProvider, MAX_HISTORY_DEPTH};
pub use path_builder::{relativize_path, RoutesPathBuilder};
pub use route::{
    generate_route_name, CustomUrlRouteDecision, RequestAttributes, RouteRequest,
    RouteResolution, ROUTE_NAME_PREFIX,
};
