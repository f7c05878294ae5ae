//! Redis-backed places cache.
//!
//! Place sets are stored as JSON strings with `SET .. EX`. Each write adds a
//! random number of seconds (up to the configured jitter) to the TTL so keys
//! written together do not all expire on the same tick.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::redis::AsyncCommands;
use rand::Rng;
use tracing::debug;

use crate::domain::Place;
use crate::domain::ports::{PlacesCache, PlacesCacheError, PlacesCacheKey};
use crate::outbound::redis_pool::{RedisPool, RedisPoolError};

/// [`PlacesCache`] adapter backed by a Redis pool.
#[derive(Clone)]
pub struct RedisPlacesCache {
    pool: RedisPool,
    ttl_jitter: Duration,
}

impl RedisPlacesCache {
    /// Cache writing through `pool` with no TTL jitter.
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            ttl_jitter: Duration::ZERO,
        }
    }

    /// Upper bound of the random extension added to every TTL.
    #[must_use]
    pub fn with_ttl_jitter(mut self, ttl_jitter: Duration) -> Self {
        self.ttl_jitter = ttl_jitter;
        self
    }
}

#[async_trait]
impl PlacesCache for RedisPlacesCache {
    async fn get(&self, key: &PlacesCacheKey) -> Result<Option<Vec<Place>>, PlacesCacheError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let payload: Option<String> = conn
            .get(key.as_str())
            .await
            .map_err(|error| PlacesCacheError::backend(error.to_string()))?;
        payload.as_deref().map(decode_places).transpose()
    }

    async fn put(
        &self,
        key: &PlacesCacheKey,
        places: &[Place],
        ttl: Duration,
    ) -> Result<(), PlacesCacheError> {
        let payload = encode_places(places)?;
        let ttl_secs = ttl_with_jitter(ttl, self.ttl_jitter, &mut rand::thread_rng());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.set_ex::<_, _, ()>(key.as_str(), payload, ttl_secs)
            .await
            .map_err(|error| PlacesCacheError::backend(error.to_string()))?;
        debug!(key = %key, ttl_secs, "places written to redis");
        Ok(())
    }
}

fn map_pool_error(error: RedisPoolError) -> PlacesCacheError {
    PlacesCacheError::backend(error.to_string())
}

fn encode_places(places: &[Place]) -> Result<String, PlacesCacheError> {
    serde_json::to_string(places)
        .map_err(|error| PlacesCacheError::serialization(error.to_string()))
}

fn decode_places(payload: &str) -> Result<Vec<Place>, PlacesCacheError> {
    serde_json::from_str(payload)
        .map_err(|error| PlacesCacheError::serialization(error.to_string()))
}

/// Whole seconds for `SET EX`: `ttl` plus up to `jitter`, never below one.
fn ttl_with_jitter(ttl: Duration, jitter: Duration, rng: &mut impl Rng) -> u64 {
    let extra = match jitter.as_secs() {
        0 => 0,
        max => rng.gen_range(0..=max),
    };
    ttl.as_secs().saturating_add(extra).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlaceCategory;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::rstest;

    #[rstest]
    fn place_payloads_survive_encoding() {
        let places = vec![
            Place::new("Geoapify:1", "Cafe", PlaceCategory::Cafe, 36.9, 30.7, Some(4.5))
                .with_detour(1.25),
        ];
        let payload = encode_places(&places).expect("encode");
        assert!(payload.contains("\"detourKm\":1.25"));
        assert_eq!(decode_places(&payload).expect("decode"), places);
    }

    #[rstest]
    fn corrupt_payloads_are_serialisation_errors() {
        let error = decode_places("{not json").expect_err("decode must fail");
        assert!(matches!(error, PlacesCacheError::Serialization { .. }));
    }

    #[rstest]
    fn ttl_without_jitter_is_exact() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(
            ttl_with_jitter(Duration::from_secs(600), Duration::ZERO, &mut rng),
            600
        );
    }

    #[rstest]
    fn ttl_jitter_stays_within_bounds() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..200 {
            let secs = ttl_with_jitter(Duration::from_secs(600), Duration::from_secs(30), &mut rng);
            assert!((600..=630).contains(&secs), "{secs} outside jitter window");
        }
    }

    #[rstest]
    fn sub_second_ttls_round_up_to_one_second() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(
            ttl_with_jitter(Duration::from_millis(10), Duration::ZERO, &mut rng),
            1
        );
    }
}
