//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod place_provider;
mod places_cache;
mod places_cache_key;
mod places_event_sink;
mod route_lookup;
mod route_places_query;

pub use place_provider::{PlaceProvider, PlaceProviderError, RawPlace};
#[cfg(test)]
pub use places_cache::MockPlacesCache;
pub use places_cache::{PlacesCache, PlacesCacheError};
pub use places_cache_key::{PlacesCacheKey, PlacesCacheKeyValidationError};
#[cfg(test)]
pub use places_event_sink::MockPlacesEventSink;
pub use places_event_sink::{
    NoOpPlacesEventSink, PlacesEventSink, PlacesEventSinkError, PlacesFetchedEvent,
};
#[cfg(test)]
pub use route_lookup::MockRouteLookup;
pub use route_lookup::{RouteLookup, RouteLookupError, RouteSummary};
#[cfg(test)]
pub use route_places_query::MockRoutePlacesQuery;
pub use route_places_query::RoutePlacesQuery;
