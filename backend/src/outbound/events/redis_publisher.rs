//! Redis pub/sub publisher for places events.

use async_trait::async_trait;
use bb8_redis::redis::AsyncCommands;
use tracing::debug;

use crate::domain::ports::{PlacesEventSink, PlacesEventSinkError, PlacesFetchedEvent};
use crate::outbound::redis_pool::RedisPool;

/// Default channel for [`PlacesFetchedEvent`] messages.
pub const DEFAULT_PLACES_EVENT_CHANNEL: &str = "places.fetched";

/// [`PlacesEventSink`] that `PUBLISH`es JSON events on one Redis channel.
#[derive(Clone)]
pub struct RedisPlacesEventPublisher {
    pool: RedisPool,
    channel: String,
}

impl RedisPlacesEventPublisher {
    /// Publisher on [`DEFAULT_PLACES_EVENT_CHANNEL`].
    pub fn new(pool: RedisPool) -> Self {
        Self::with_channel(pool, DEFAULT_PLACES_EVENT_CHANNEL)
    }

    pub fn with_channel(pool: RedisPool, channel: impl Into<String>) -> Self {
        Self {
            pool,
            channel: channel.into(),
        }
    }
}

#[async_trait]
impl PlacesEventSink for RedisPlacesEventPublisher {
    async fn publish(&self, event: &PlacesFetchedEvent) -> Result<(), PlacesEventSinkError> {
        let payload = encode_event(event)?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| PlacesEventSinkError::publish(error.to_string()))?;
        let receivers: i64 = conn
            .publish(self.channel.as_str(), payload)
            .await
            .map_err(|error| PlacesEventSinkError::publish(error.to_string()))?;
        debug!(channel = %self.channel, receivers, "places event published");
        Ok(())
    }
}

fn encode_event(event: &PlacesFetchedEvent) -> Result<String, PlacesEventSinkError> {
    serde_json::to_string(event).map_err(|error| PlacesEventSinkError::encode(error.to_string()))
}
