//! Geoapify Places outbound adapter.

mod dto;
mod http_source;

pub use http_source::GeoapifyPlaceProvider;

/// Provider name and id namespace for Geoapify places.
pub const PROVIDER_NAME: &str = "Geoapify";
