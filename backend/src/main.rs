//! Places server entry-point: loads settings, wires adapters and serves the
//! REST endpoints.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use roadify_places::PlacesSettings;
use roadify_places::inbound::http::health::HealthState;

use server::{ServerConfig, build_places_service, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = PlacesSettings::load().map_err(|e| {
        std::io::Error::other(format!("failed to load configuration: {e}"))
    })?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let places = build_places_service(&settings).await?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, places))?;

    info!(%bind_addr, "places server listening");
    server.await
}
