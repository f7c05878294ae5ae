//! Port interface for caching a route's enriched place set.
use std::time::Duration;

use async_trait::async_trait;

use super::{PlacesCacheKey, define_port_error};
use crate::domain::Place;

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum PlacesCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "places cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "places cache serialisation failed: {message}",
    }
}

/// Key/value store of unfiltered place sets with per-entry TTL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacesCache: Send + Sync {
    /// Read the cached places for `key`; `None` on a miss or expiry.
    async fn get(&self, key: &PlacesCacheKey) -> Result<Option<Vec<Place>>, PlacesCacheError>;

    /// Store `places` under `key` for `ttl`, replacing any previous entry.
    async fn put(
        &self,
        key: &PlacesCacheKey,
        places: &[Place],
        ttl: Duration,
    ) -> Result<(), PlacesCacheError>;
}
