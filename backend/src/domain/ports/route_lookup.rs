//! Driven port for the route service that owns route geometry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::define_port_error;

/// Summary of a stored route as exposed by the route service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub id: String,
    #[serde(default)]
    pub distance_km: f64,
    #[serde(default)]
    pub duration_minutes: f64,
    /// Encoded polyline; may be empty when the route service has none.
    #[serde(default)]
    pub geometry: String,
}

define_port_error! {
    /// Errors surfaced by route lookups.
    pub enum RouteLookupError {
        /// The route service has no route with this id.
        NotFound { route_id: String } => "route {route_id} not found",
        /// The route service could not be reached or answered with a failure.
        Transport { message: String } => "route service transport failed: {message}",
        /// The route service answered with an unreadable payload.
        Decode { message: String } => "route service response decode failed: {message}",
    }
}

/// Port for resolving a route id to its geometry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RouteLookup: Send + Sync {
    /// Fetch the route summary for `route_id`.
    async fn route_geometry(&self, route_id: &str) -> Result<RouteSummary, RouteLookupError>;
}
