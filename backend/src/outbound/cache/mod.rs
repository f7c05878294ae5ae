//! Places cache adapters.
//!
//! - [`RedisPlacesCache`]: shared cache over a `bb8-redis` pool with JSON
//!   payloads and TTL jitter.
//! - [`InMemoryPlacesCache`]: process-local fallback with clock-driven expiry,
//!   used when no Redis URL is configured.

mod memory;
mod redis;

pub use memory::InMemoryPlacesCache;
pub use redis::RedisPlacesCache;
