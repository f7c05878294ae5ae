//! Builders that turn settings into the driven adapters behind the places
//! service.

use std::sync::Arc;

use tracing::{info, warn};

use roadify_places::PlacesSettings;
use roadify_places::domain::ports::{
    NoOpPlacesEventSink, PlaceProvider, PlacesCache, PlacesEventSink, RoutePlacesQuery,
};
use roadify_places::domain::{PlacesAggregationService, PlacesServicePorts};
use roadify_places::outbound::cache::{InMemoryPlacesCache, RedisPlacesCache};
use roadify_places::outbound::events::RedisPlacesEventPublisher;
use roadify_places::outbound::geoapify::GeoapifyPlaceProvider;
use roadify_places::outbound::overpass::{OverpassHttpIdentity, OverpassPlaceProvider};
use roadify_places::outbound::redis_pool::{RedisPool, RedisPoolConfig};
use roadify_places::outbound::route_service::HttpRouteLookup;

fn io_error(context: &str, error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {error}"))
}

/// Providers enabled by `settings`, in fan-out order.
///
/// # Errors
///
/// Returns [`std::io::Error`] when an endpoint is malformed or an HTTP client
/// cannot be built.
pub fn build_providers(settings: &PlacesSettings) -> std::io::Result<Vec<Arc<dyn PlaceProvider>>> {
    let mut providers: Vec<Arc<dyn PlaceProvider>> = Vec::new();
    let timeout = settings.provider_timeout();
    let padding = settings.bbox_padding_degrees();

    match settings.geoapify_api_key() {
        Some(api_key) => {
            let endpoint = settings
                .geoapify_url()
                .map_err(|e| io_error("geoapify endpoint", e))?;
            let provider = GeoapifyPlaceProvider::new(endpoint, api_key, timeout)
                .map_err(|e| io_error("geoapify client", e))?
                .with_limit(settings.geoapify_limit())
                .with_padding(padding);
            providers.push(Arc::new(provider));
        }
        None => info!("geoapify disabled: no API key configured"),
    }

    if settings.overpass_disabled {
        info!("overpass disabled by configuration");
    } else {
        let endpoint = settings
            .overpass_url()
            .map_err(|e| io_error("overpass endpoint", e))?;
        let mut identity = OverpassHttpIdentity::default();
        if let Some(contact) = settings.overpass_contact() {
            contact.clone_into(&mut identity.contact);
        }
        let provider = OverpassPlaceProvider::with_identity(endpoint, timeout, identity)
            .map_err(|e| io_error("overpass client", e))?
            .with_padding(padding);
        providers.push(Arc::new(provider));
    }

    if providers.is_empty() {
        warn!("no place providers configured; every route will return no places");
    }
    Ok(providers)
}

/// Cache and event sink: Redis-backed when a URL is configured, otherwise an
/// in-process cache and no events.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the Redis URL is malformed.
pub async fn build_cache_and_events(
    settings: &PlacesSettings,
) -> std::io::Result<(Arc<dyn PlacesCache>, Arc<dyn PlacesEventSink>)> {
    let Some(redis_url) = settings.redis_url() else {
        info!("redis not configured: using in-process cache without events");
        return Ok((
            Arc::new(InMemoryPlacesCache::default()),
            Arc::new(NoOpPlacesEventSink),
        ));
    };

    let mut pool_config = RedisPoolConfig::new(redis_url);
    if let Some(size) = settings.redis_pool_size() {
        pool_config = pool_config.with_max_size(size);
    }
    let pool = RedisPool::new(pool_config)
        .await
        .map_err(|e| io_error("redis pool", e))?;
    info!(channel = settings.events_channel(), "redis cache and events enabled");

    let cache = RedisPlacesCache::new(pool.clone()).with_ttl_jitter(settings.cache_ttl_jitter());
    let events = RedisPlacesEventPublisher::with_channel(pool, settings.events_channel());
    Ok((Arc::new(cache), Arc::new(events)))
}

/// Wire the aggregation service from `settings`.
///
/// # Errors
///
/// Returns [`std::io::Error`] when any adapter cannot be constructed.
pub async fn build_places_service(
    settings: &PlacesSettings,
) -> std::io::Result<Arc<dyn RoutePlacesQuery>> {
    let route_base = settings
        .route_service_url()
        .map_err(|e| io_error("route service url", e))?;
    let route_lookup = HttpRouteLookup::new(route_base, settings.route_timeout())
        .map_err(|e| io_error("route service client", e))?;
    let providers = build_providers(settings)?;
    let (cache, events) = build_cache_and_events(settings).await?;

    let service = PlacesAggregationService::new(
        PlacesServicePorts {
            providers,
            route_lookup: Arc::new(route_lookup),
            cache,
            events,
        },
        settings.service_config(),
    );
    Ok(Arc::new(service))
}
