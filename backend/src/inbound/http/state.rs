//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::RoutePlacesQuery;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub places: Arc<dyn RoutePlacesQuery>,
}

impl HttpState {
    /// Construct state from the places use-case.
    pub fn new(places: Arc<dyn RoutePlacesQuery>) -> Self {
        Self { places }
    }
}
