//! Outbound adapters implementing the domain's driven ports.
//!
//! - `geoapify`, `overpass`: place providers over HTTP.
//! - `route_service`: route geometry lookups.
//! - `cache`: Redis and in-memory place caches.
//! - `events`: Redis pub/sub event publisher.

pub mod cache;
pub mod events;
pub mod geoapify;
pub(crate) mod http_support;
pub mod overpass;
pub mod redis_pool;
pub mod route_service;
