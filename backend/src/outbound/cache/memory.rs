//! Process-local places cache with clock-driven expiry.
//!
//! Used when no Redis URL is configured. Entries expire lazily: an expired
//! entry is removed by the read that finds it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::Place;
use crate::domain::ports::{PlacesCache, PlacesCacheError, PlacesCacheKey};

struct Entry {
    places: Vec<Place>,
    expires_at: DateTime<Utc>,
}

/// In-memory [`PlacesCache`].
pub struct InMemoryPlacesCache {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryPlacesCache {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl InMemoryPlacesCache {
    /// Cache reading the current time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, expired ones included until read.
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |entries| entries.len())
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, PlacesCacheError> {
        self.entries
            .lock()
            .map_err(|_| PlacesCacheError::backend("in-memory cache lock poisoned"))
    }
}

#[async_trait]
impl PlacesCache for InMemoryPlacesCache {
    async fn get(&self, key: &PlacesCacheKey) -> Result<Option<Vec<Place>>, PlacesCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        match entries.get(key.as_str()) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.places.clone())),
            Some(_) => {
                entries.remove(key.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &PlacesCacheKey,
        places: &[Place],
        ttl: Duration,
    ) -> Result<(), PlacesCacheError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|error| PlacesCacheError::backend(format!("unsupported ttl: {error}")))?;
        let expires_at = self.clock.utc() + ttl;
        self.lock()?.insert(
            key.as_str().to_owned(),
            Entry {
                places: places.to_vec(),
                expires_at,
            },
        );
        Ok(())
    }
}
