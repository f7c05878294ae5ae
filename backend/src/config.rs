//! Service configuration loaded via OrthoConfig.
//!
//! Every field can be supplied as a `PLACES_*` environment variable, a CLI
//! flag or a configuration file entry. Unset values fall back to the defaults
//! exposed through the accessor methods.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{PlacesServiceConfig, RatingFilter};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ROUTE_SERVICE_URL: &str = "http://localhost:8081";
const DEFAULT_GEOAPIFY_URL: &str = "https://api.geoapify.com/v2/places";
const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 8_000;
const DEFAULT_ROUTE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_GEOAPIFY_LIMIT: u32 = 50;
const DEFAULT_BBOX_PADDING_DEGREES: f64 = 0.05;
const DEFAULT_CACHE_TTL_SECS: u64 = 600;
const DEFAULT_EVENTS_CHANNEL: &str = "places.fetched";

/// Configuration failures detected while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{field} is not a valid URL: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("bind_addr is not a socket address: {value}")]
    InvalidBindAddr { value: String },
}

/// Configuration values for the places server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PLACES")]
pub struct PlacesSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// Base URL of the route service.
    pub route_service_url: Option<String>,
    /// Timeout for route service calls, in milliseconds.
    pub route_timeout_ms: Option<u64>,
    /// Geoapify Places endpoint.
    pub geoapify_url: Option<String>,
    /// Geoapify API key. The provider is disabled when unset.
    pub geoapify_api_key: Option<String>,
    /// Maximum features requested from Geoapify per call.
    pub geoapify_limit: Option<u32>,
    /// Disable the Overpass provider.
    #[ortho_config(default = false)]
    pub overpass_disabled: bool,
    /// Overpass interpreter endpoint.
    pub overpass_url: Option<String>,
    /// Contact address sent to Overpass alongside the user agent.
    pub overpass_contact: Option<String>,
    /// Upper bound for a single provider call, in milliseconds.
    pub provider_timeout_ms: Option<u64>,
    /// Degrees added around the route bounds for provider queries.
    pub bbox_padding_degrees: Option<f64>,
    /// Cached place set lifetime, in seconds.
    pub cache_ttl_secs: Option<u64>,
    /// Random extra lifetime added per Redis write, in seconds.
    pub cache_ttl_jitter_secs: Option<u64>,
    /// Redis connection URL. In-process caching and no events when unset.
    pub redis_url: Option<String>,
    /// Redis pool size.
    pub redis_pool_size: Option<u32>,
    /// Pub/sub channel for aggregation events.
    pub events_channel: Option<String>,
    /// Honour `minRating` query parameters.
    #[ortho_config(default = false)]
    pub enforce_min_rating: bool,
}

fn parse_url(field: &'static str, value: Option<&str>, default: &str) -> Result<Url, SettingsError> {
    Url::parse(value.unwrap_or(default)).map_err(|source| SettingsError::InvalidUrl { field, source })
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|trimmed| !trimmed.is_empty())
}

impl PlacesSettings {
    /// Return the listen address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not
    /// parse as a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Return the route service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] for malformed values.
    pub fn route_service_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "route_service_url",
            self.route_service_url.as_deref(),
            DEFAULT_ROUTE_SERVICE_URL,
        )
    }

    pub fn route_timeout(&self) -> Duration {
        Duration::from_millis(self.route_timeout_ms.unwrap_or(DEFAULT_ROUTE_TIMEOUT_MS))
    }

    /// Return the Geoapify endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] for malformed values.
    pub fn geoapify_url(&self) -> Result<Url, SettingsError> {
        parse_url("geoapify_url", self.geoapify_url.as_deref(), DEFAULT_GEOAPIFY_URL)
    }

    /// Return the Geoapify API key when one is configured and not blank.
    pub fn geoapify_api_key(&self) -> Option<&str> {
        non_blank(self.geoapify_api_key.as_ref())
    }

    pub fn geoapify_limit(&self) -> u32 {
        self.geoapify_limit.unwrap_or(DEFAULT_GEOAPIFY_LIMIT)
    }

    /// Return the Overpass endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] for malformed values.
    pub fn overpass_url(&self) -> Result<Url, SettingsError> {
        parse_url("overpass_url", self.overpass_url.as_deref(), DEFAULT_OVERPASS_URL)
    }

    pub fn overpass_contact(&self) -> Option<&str> {
        non_blank(self.overpass_contact.as_ref())
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(
            self.provider_timeout_ms
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_MS),
        )
    }

    /// Return the bounding box padding; negative or non-finite values fall
    /// back to the default.
    pub fn bbox_padding_degrees(&self) -> f64 {
        self.bbox_padding_degrees
            .filter(|padding| padding.is_finite() && *padding >= 0.0)
            .unwrap_or(DEFAULT_BBOX_PADDING_DEGREES)
    }

    /// Return the cache lifetime; zero falls back to the default.
    pub fn cache_ttl(&self) -> Duration {
        let secs = self
            .cache_ttl_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);
        Duration::from_secs(secs)
    }

    pub fn cache_ttl_jitter(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_jitter_secs.unwrap_or(0))
    }

    /// Return the Redis URL when one is configured and not blank.
    pub fn redis_url(&self) -> Option<&str> {
        non_blank(self.redis_url.as_ref())
    }

    pub fn redis_pool_size(&self) -> Option<u32> {
        self.redis_pool_size
    }

    pub fn events_channel(&self) -> &str {
        non_blank(self.events_channel.as_ref()).unwrap_or(DEFAULT_EVENTS_CHANNEL)
    }

    pub fn rating_filter(&self) -> RatingFilter {
        if self.enforce_min_rating {
            RatingFilter::Enforced
        } else {
            RatingFilter::Ignored
        }
    }

    /// Tunables for the aggregation service derived from these settings.
    pub fn service_config(&self) -> PlacesServiceConfig {
        PlacesServiceConfig {
            provider_timeout: self.provider_timeout(),
            cache_ttl: self.cache_ttl(),
            rating_filter: self.rating_filter(),
        }
    }
}
