//! Driven port for third-party point-of-interest providers.
//!
//! Each provider adapter owns its protocol, authentication and response
//! schema. The domain only sees [`RawPlace`] records and a typed failure.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::geometry::RouteGeometry;

/// Provider-scoped place record, consumed only by normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlace {
    /// Provider name, used as the id namespace (`Geoapify`, `Overpass`).
    pub provider: String,
    /// Provider-local identifier.
    pub external_id: String,
    pub name: String,
    /// Provider category tags, most relevant first.
    pub tags: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
}

impl RawPlace {
    /// Build an unrated record.
    pub fn new(
        provider: impl Into<String>,
        external_id: impl Into<String>,
        name: impl Into<String>,
        tags: Vec<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            provider: provider.into(),
            external_id: external_id.into(),
            name: name.into(),
            tags,
            latitude,
            longitude,
            rating: None,
        }
    }

    /// Attach a provider rating.
    #[must_use]
    pub fn with_rating(mut self, rating: Option<f64>) -> Self {
        self.rating = rating;
        self
    }
}

define_port_error! {
    /// Errors surfaced by place providers.
    pub enum PlaceProviderError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "place provider transport failed: {message}",
        /// The provider did not answer in time.
        Timeout { message: String } =>
            "place provider timeout: {message}",
        /// The provider throttled the request.
        RateLimited { message: String } =>
            "place provider rate limited request: {message}",
        /// The provider's response could not be decoded.
        Decode { message: String } =>
            "place provider response decode failed: {message}",
        /// The adapter rejected the request before sending it.
        InvalidRequest { message: String } =>
            "place provider request invalid: {message}",
    }
}

/// Port for fetching candidate places along a route.
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Stable provider name used in logs and place ids.
    fn name(&self) -> &str;

    /// Fetch raw places near `geometry`.
    async fn fetch_places(
        &self,
        geometry: &RouteGeometry,
    ) -> Result<Vec<RawPlace>, PlaceProviderError>;
}
