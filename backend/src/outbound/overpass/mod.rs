//! Overpass outbound adapter.
//!
//! This module provides a thin HTTP implementation of the `PlaceProvider`
//! port backed by the OpenStreetMap Overpass API.

mod dto;
mod http_source;

pub use http_source::{OverpassHttpIdentity, OverpassPlaceProvider};

/// Provider name and id namespace for Overpass places.
pub const PROVIDER_NAME: &str = "Overpass";
