//! Places aggregation along a route.
//!
//! The service owns the read path end to end: cache lookup, route geometry,
//! concurrent provider fan-out, normalisation, detour enrichment, the
//! cache-write policy, event emission and final filtering. Provider and cache
//! faults degrade the result; only route lookup failures and invalid input
//! reach the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::filter::{PlaceFilterCriteria, RatingFilter, filter_places};
use crate::domain::geometry::{LatLon, RouteGeometry};
use crate::domain::geometry::detour::detour_km;
use crate::domain::normalizer::normalize;
use crate::domain::ports::{
    PlaceProvider, PlacesCache, PlacesCacheKey, PlacesEventSink, PlacesFetchedEvent, RouteLookup,
    RouteLookupError, RoutePlacesQuery,
};
use crate::domain::{Error, Place, TraceId};

mod cache_policy;
mod fetch;

pub use cache_policy::CacheWriteDecision;
pub use fetch::ProviderFetchOutcome;

/// Tunables for [`PlacesAggregationService`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlacesServiceConfig {
    /// Upper bound for a single provider call.
    pub provider_timeout: Duration,
    /// Lifetime of a cached place set.
    pub cache_ttl: Duration,
    /// Whether `min_rating` criteria are honoured.
    pub rating_filter: RatingFilter,
}

impl Default for PlacesServiceConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(8),
            cache_ttl: Duration::from_secs(600),
            rating_filter: RatingFilter::Ignored,
        }
    }
}

/// Port bundle required by the aggregation service.
pub struct PlacesServicePorts {
    /// Providers queried on every cache miss.
    pub providers: Vec<Arc<dyn PlaceProvider>>,
    /// Route service client.
    pub route_lookup: Arc<dyn RouteLookup>,
    /// Result cache.
    pub cache: Arc<dyn PlacesCache>,
    /// Aggregation event sink.
    pub events: Arc<dyn PlacesEventSink>,
}

/// Aggregates, enriches, caches and filters places for a route.
pub struct PlacesAggregationService {
    providers: Vec<Arc<dyn PlaceProvider>>,
    route_lookup: Arc<dyn RouteLookup>,
    cache: Arc<dyn PlacesCache>,
    events: Arc<dyn PlacesEventSink>,
    config: PlacesServiceConfig,
}

impl PlacesAggregationService {
    /// Build the service from its ports.
    #[must_use]
    pub fn new(ports: PlacesServicePorts, config: PlacesServiceConfig) -> Self {
        Self {
            providers: ports.providers,
            route_lookup: ports.route_lookup,
            cache: ports.cache,
            events: ports.events,
            config,
        }
    }

    /// Places along `route_id`, shaped by `criteria`.
    ///
    /// Returns an empty list when nothing is found. Fails with
    /// `invalid_request` for a malformed route id, `not_found` when the route
    /// service does not know the route and `service_unavailable` when the
    /// route service cannot be reached.
    pub async fn get_places(
        &self,
        route_id: &str,
        criteria: &PlaceFilterCriteria,
    ) -> Result<Vec<Place>, Error> {
        info!(
            route_id,
            category = ?criteria.category,
            max_detour_km = ?criteria.max_detour_km,
            limit = ?criteria.limit,
            offset = ?criteria.offset,
            "places requested"
        );
        let key = PlacesCacheKey::for_route(route_id)
            .map_err(|error| Error::invalid_request(error.to_string()))?;

        if let Some(cached) = self.read_cache(&key).await {
            info!(key = %key, size = cached.len(), "places cache hit");
            return Ok(self.apply_filter(&cached, criteria));
        }
        info!(key = %key, "places cache miss");

        let route = self
            .route_lookup
            .route_geometry(route_id)
            .await
            .map_err(map_route_error)?;
        let geometry = Arc::new(RouteGeometry::decode(route.geometry));

        let outcomes =
            fetch::fetch_all(&self.providers, &geometry, self.config.provider_timeout).await;
        let raw_places: Vec<_> = outcomes
            .iter()
            .flat_map(|outcome| outcome.places.iter().cloned())
            .collect();
        info!(route_id, raw = raw_places.len(), "provider fan-out complete");

        let places = enrich_with_detour(normalize(&raw_places), &geometry);
        log_detour_stats(&places);

        self.apply_cache_policy(&key, &outcomes, &places).await;
        self.publish_event(route_id, &places);

        let filtered = self.apply_filter(&places, criteria);
        info!(route_id, returned = filtered.len(), "places served");
        Ok(filtered)
    }

    async fn read_cache(&self, key: &PlacesCacheKey) -> Option<Vec<Place>> {
        match self.cache.get(key).await {
            Ok(Some(places)) if !places.is_empty() => Some(places),
            Ok(_) => None,
            Err(error) => {
                warn!(key = %key, error = %error, "places cache read failed; treating as miss");
                None
            }
        }
    }

    async fn apply_cache_policy(
        &self,
        key: &PlacesCacheKey,
        outcomes: &[ProviderFetchOutcome],
        places: &[Place],
    ) {
        match CacheWriteDecision::decide(outcomes, places) {
            CacheWriteDecision::Write => {
                match self.cache.put(key, places, self.config.cache_ttl).await {
                    Ok(()) => info!(
                        key = %key,
                        size = places.len(),
                        ttl_secs = self.config.cache_ttl.as_secs(),
                        "places cached"
                    ),
                    Err(error) => warn!(key = %key, error = %error, "places cache write failed"),
                }
            }
            CacheWriteDecision::SkipProviderFailure { failed_providers } => warn!(
                key = %key,
                failed_providers = ?failed_providers,
                "skipping places cache write after provider failure"
            ),
            CacheWriteDecision::SkipEmpty => {
                info!(key = %key, "skipping places cache write for empty result");
            }
        }
    }

    fn publish_event(&self, route_id: &str, places: &[Place]) {
        let event = PlacesFetchedEvent::summarise(route_id, places);
        let events = Arc::clone(&self.events);
        TraceId::spawn_scoped(async move {
            match events.publish(&event).await {
                Ok(()) => debug!(
                    route_id = %event.route_id,
                    total_count = event.total_count,
                    "places fetched event published"
                ),
                Err(error) => warn!(
                    route_id = %event.route_id,
                    error = %error,
                    "places fetched event dropped"
                ),
            }
        });
    }

    fn apply_filter(&self, places: &[Place], criteria: &PlaceFilterCriteria) -> Vec<Place> {
        filter_places(places, criteria, self.config.rating_filter)
    }
}

#[async_trait]
impl RoutePlacesQuery for PlacesAggregationService {
    async fn places_for_route(
        &self,
        route_id: &str,
        criteria: &PlaceFilterCriteria,
    ) -> Result<Vec<Place>, Error> {
        self.get_places(route_id, criteria).await
    }
}

fn enrich_with_detour(places: Vec<Place>, geometry: &RouteGeometry) -> Vec<Place> {
    if !geometry.supports_detour() {
        warn!(
            points = geometry.points().len(),
            "route geometry unavailable; detours default to zero"
        );
        return places;
    }
    places
        .iter()
        .map(|place| {
            let point = LatLon::new(place.latitude, place.longitude);
            place.with_detour(detour_km(point, geometry.points()))
        })
        .collect()
}

fn log_detour_stats(places: &[Place]) {
    if places.is_empty() {
        debug!("detour stats: empty result");
        return;
    }
    let zeros = places.iter().filter(|place| place.detour_km == 0.0).count();
    let (min, max, sum) = places.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), place| {
            (
                min.min(place.detour_km),
                max.max(place.detour_km),
                sum + place.detour_km,
            )
        },
    );
    let average = sum / places.len() as f64;
    debug!(count = places.len(), zeros, min, max, average, "detour stats");
}

fn map_route_error(error: RouteLookupError) -> Error {
    match error {
        RouteLookupError::NotFound { route_id } => {
            Error::not_found(format!("route {route_id} not found"))
        }
        other @ (RouteLookupError::Transport { .. } | RouteLookupError::Decode { .. }) => {
            warn!(error = %other, "route lookup failed");
            Error::service_unavailable("route service unavailable")
        }
    }
}
