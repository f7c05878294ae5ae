//! Places event adapters.

mod redis_publisher;

pub use redis_publisher::{DEFAULT_PLACES_EVENT_CHANNEL, RedisPlacesEventPublisher};
