//! Reqwest-backed Overpass place provider.
//!
//! This adapter owns transport details only: query construction over the
//! route's bounding box, request timeout and HTTP error mapping, and JSON
//! decoding into raw places.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::PROVIDER_NAME;
use super::dto::OverpassResponseDto;
use crate::domain::geometry::{BoundingBox, RouteGeometry};
use crate::domain::ports::{PlaceProvider, PlaceProviderError, RawPlace};
use crate::outbound::http_support::{map_status_error, map_transport_error};

const DEFAULT_OVERPASS_QUERY_TIMEOUT_SECONDS: u32 = 25;
const DEFAULT_USER_AGENT: &str = "roadify-places/0.1";
const DEFAULT_CONTACT: &str = "ops@roadify.invalid";
const DEFAULT_PADDING_DEGREES: f64 = 0.05;

/// Tag filters queried for every route, one Overpass statement per element
/// type and selector.
const PLACE_SELECTORS: [&str; 3] = [
    r#"["amenity"~"^(restaurant|fast_food|cafe|fuel|toilets|marketplace)$"]"#,
    r#"["tourism"~"^(hotel|motel|guest_house|camp_site|caravan_site|attraction|viewpoint|museum)$"]"#,
    r#"["shop"~"^(supermarket|convenience|mall)$"]"#,
];

/// Outbound identity and query timeout settings for Overpass requests.
pub struct OverpassHttpIdentity {
    /// HTTP user-agent sent to Overpass.
    pub user_agent: String,
    /// Contact header value sent to Overpass.
    pub contact: String,
    /// Timeout directive embedded in Overpass query text.
    pub query_timeout_seconds: u32,
}

impl Default for OverpassHttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            contact: DEFAULT_CONTACT.to_owned(),
            query_timeout_seconds: DEFAULT_OVERPASS_QUERY_TIMEOUT_SECONDS,
        }
    }
}

/// Place provider that performs HTTP POST requests against one Overpass
/// endpoint.
pub struct OverpassPlaceProvider {
    client: Client,
    endpoint: Url,
    user_agent: String,
    contact: String,
    query_timeout_seconds: u32,
    padding_degrees: f64,
}

impl OverpassPlaceProvider {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let provider = OverpassPlaceProvider::new(endpoint, timeout)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_identity(endpoint, timeout, OverpassHttpIdentity::default())
    }

    /// Build an adapter with explicit outbound identity and query timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        endpoint: Url,
        timeout: Duration,
        identity: OverpassHttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            user_agent: identity.user_agent,
            contact: identity.contact,
            query_timeout_seconds: identity.query_timeout_seconds.max(1),
            padding_degrees: DEFAULT_PADDING_DEGREES,
        })
    }

    /// Degrees added on every side of the route bounds before querying.
    #[must_use]
    pub fn with_padding(mut self, padding_degrees: f64) -> Self {
        self.padding_degrees = padding_degrees;
        self
    }
}

#[async_trait]
impl PlaceProvider for OverpassPlaceProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_places(
        &self,
        geometry: &RouteGeometry,
    ) -> Result<Vec<RawPlace>, PlaceProviderError> {
        let bounds = geometry.bounding_box(self.padding_degrees).ok_or_else(|| {
            PlaceProviderError::invalid_request("route geometry has no decodable points")
        })?;
        let query = build_overpass_query(&bounds, self.query_timeout_seconds)?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header("Contact", self.contact.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("data", query)])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let places = parse_places(body.as_ref())?;
        debug!(
            transfer_bytes = body.len(),
            places = places.len(),
            "overpass places decoded"
        );
        Ok(places)
    }
}

fn parse_places(body: &[u8]) -> Result<Vec<RawPlace>, PlaceProviderError> {
    let decoded: OverpassResponseDto = serde_json::from_slice(body).map_err(|error| {
        PlaceProviderError::decode(format!("invalid Overpass JSON payload: {error}"))
    })?;
    Ok(decoded.into_raw_places())
}

fn build_overpass_query(
    bounds: &BoundingBox,
    query_timeout_seconds: u32,
) -> Result<String, PlaceProviderError> {
    validate_bounding_box(bounds)?;
    let bbox = format!(
        "({min_lat},{min_lng},{max_lat},{max_lng})",
        min_lat = bounds.min_lat,
        min_lng = bounds.min_lng,
        max_lat = bounds.max_lat,
        max_lng = bounds.max_lng,
    );

    let mut lines = Vec::with_capacity(PLACE_SELECTORS.len() * 2);
    for selector in PLACE_SELECTORS {
        for element_type in ["node", "way"] {
            lines.push(format!("  {element_type}{selector}{bbox};"));
        }
    }

    Ok(format!(
        "[out:json][timeout:{query_timeout_seconds}];\n(\n{query_lines}\n);\nout center tags;",
        query_lines = lines.join("\n")
    ))
}

fn validate_bounding_box(bounds: &BoundingBox) -> Result<(), PlaceProviderError> {
    let BoundingBox {
        min_lat,
        min_lng,
        max_lat,
        max_lng,
    } = *bounds;
    if [min_lng, min_lat, max_lng, max_lat]
        .into_iter()
        .any(|value| !value.is_finite())
    {
        return Err(PlaceProviderError::invalid_request(
            "bounding box must contain finite coordinates",
        ));
    }
    if min_lng >= max_lng || min_lat >= max_lat {
        return Err(PlaceProviderError::invalid_request(
            "bounding box must have a positive area",
        ));
    }
    if !(-180.0..=180.0).contains(&min_lng) || !(-180.0..=180.0).contains(&max_lng) {
        return Err(PlaceProviderError::invalid_request(
            "longitude must be within [-180, 180]",
        ));
    }
    if !(-90.0..=90.0).contains(&min_lat) || !(-90.0..=90.0).contains(&max_lat) {
        return Err(PlaceProviderError::invalid_request(
            "latitude must be within [-90, 90]",
        ));
    }
    Ok(())
}
