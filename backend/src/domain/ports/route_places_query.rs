//! Driving port for reading the places along a route.

use async_trait::async_trait;

use crate::domain::{Error, Place, PlaceFilterCriteria};

/// Use-case behind `GET /api/v1/routes/{route_id}/places`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoutePlacesQuery: Send + Sync {
    /// Places along `route_id`, filtered and paged by `criteria`.
    async fn places_for_route(
        &self,
        route_id: &str,
        criteria: &PlaceFilterCriteria,
    ) -> Result<Vec<Place>, Error>;
}
