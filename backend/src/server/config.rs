//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use roadify_places::domain::ports::RoutePlacesQuery;

/// Everything the HTTP server needs once adapters are wired.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) places: Arc<dyn RoutePlacesQuery>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, places: Arc<dyn RoutePlacesQuery>) -> Self {
        Self { bind_addr, places }
    }
}
