//! Reqwest-backed Geoapify Places provider.
//!
//! Queries the Places API for every supported category inside the padded
//! bounding box of the route and decodes the GeoJSON answer into raw places.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::PROVIDER_NAME;
use super::dto::GeoapifyResponseDto;
use crate::domain::PlaceCategory;
use crate::domain::geometry::{BoundingBox, RouteGeometry};
use crate::domain::ports::{PlaceProvider, PlaceProviderError, RawPlace};
use crate::outbound::http_support::{map_status_error, map_transport_error};

const DEFAULT_LIMIT: u32 = 50;
const DEFAULT_LANG: &str = "en";
const DEFAULT_PADDING_DEGREES: f64 = 0.05;

/// Geoapify category identifiers requested for each place category.
const GEOAPIFY_CATEGORIES: [(PlaceCategory, &[&str]); 9] = [
    (
        PlaceCategory::Food,
        &["catering.restaurant", "catering.fast_food"],
    ),
    (PlaceCategory::Cafe, &["catering.cafe"]),
    (PlaceCategory::Fuel, &["service.vehicle.fuel"]),
    (
        PlaceCategory::Tourist,
        &["tourism.sights", "tourism.attraction"],
    ),
    (
        PlaceCategory::Market,
        &["commercial.supermarket", "commercial.marketplace"],
    ),
    (PlaceCategory::Wc, &["amenity.toilet"]),
    (
        PlaceCategory::Hotel,
        &["accommodation.hotel", "accommodation.guest_house"],
    ),
    (
        PlaceCategory::Camping,
        &["camping.camp_site", "camping.caravan_site"],
    ),
    (
        PlaceCategory::Shop,
        &["commercial.convenience", "commercial.shopping_mall"],
    ),
];

/// Place provider backed by the Geoapify Places API.
pub struct GeoapifyPlaceProvider {
    client: Client,
    endpoint: Url,
    api_key: String,
    limit: u32,
    padding_degrees: f64,
}

impl GeoapifyPlaceProvider {
    /// Build an adapter for `endpoint` (for example
    /// `https://api.geoapify.com/v2/places`).
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            limit: DEFAULT_LIMIT,
            padding_degrees: DEFAULT_PADDING_DEGREES,
        })
    }

    /// Maximum number of features requested per call.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Degrees added on every side of the route bounds before querying.
    #[must_use]
    pub fn with_padding(mut self, padding_degrees: f64) -> Self {
        self.padding_degrees = padding_degrees;
        self
    }

    fn query_params(&self, bounds: &BoundingBox) -> Vec<(&'static str, String)> {
        vec![
            ("categories", categories_param()),
            ("filter", rect_filter(bounds)),
            ("limit", self.limit.to_string()),
            ("lang", DEFAULT_LANG.to_owned()),
            ("apiKey", self.api_key.clone()),
        ]
    }
}

#[async_trait]
impl PlaceProvider for GeoapifyPlaceProvider {
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
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&self.query_params(&bounds))
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
            "geoapify places decoded"
        );
        Ok(places)
    }
}

fn parse_places(body: &[u8]) -> Result<Vec<RawPlace>, PlaceProviderError> {
    let decoded: GeoapifyResponseDto = serde_json::from_slice(body).map_err(|error| {
        PlaceProviderError::decode(format!("invalid Geoapify JSON payload: {error}"))
    })?;
    Ok(decoded.into_raw_places())
}

/// Comma-separated, de-duplicated `categories` value covering every category.
fn categories_param() -> String {
    let mut categories: Vec<&str> = Vec::new();
    for (_, names) in GEOAPIFY_CATEGORIES {
        for &name in names {
            if !categories.contains(&name) {
                categories.push(name);
            }
        }
    }
    categories.join(",")
}

/// `rect:lon1,lat1,lon2,lat2` with the western/southern corner first.
fn rect_filter(bounds: &BoundingBox) -> String {
    format!(
        "rect:{},{},{},{}",
        bounds.min_lng, bounds.min_lat, bounds.max_lng, bounds.max_lat
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> GeoapifyPlaceProvider {
        let endpoint = Url::parse("http://127.0.0.1:9/v2/places").expect("valid url");
        GeoapifyPlaceProvider::new(endpoint, "test-key", Duration::from_secs(1))
            .expect("client builds")
    }

    #[rstest]
    fn rect_filter_lists_longitude_first() {
        let bounds = BoundingBox {
            min_lat: 36.85,
            min_lng: 30.65,
            max_lat: 36.95,
            max_lng: 30.8,
        };
        assert_eq!(rect_filter(&bounds), "rect:30.65,36.85,30.8,36.95");
    }

    #[rstest]
    fn categories_cover_every_mapped_category_once() {
        let param = categories_param();
        let names: Vec<&str> = param.split(',').collect();
        assert!(names.contains(&"service.vehicle.fuel"));
        assert!(names.contains(&"camping.caravan_site"));
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[rstest]
    fn query_params_carry_limit_language_and_key(provider: GeoapifyPlaceProvider) {
        let provider = provider.with_limit(20);
        let bounds = BoundingBox {
            min_lat: 1.0,
            min_lng: 2.0,
            max_lat: 3.0,
            max_lng: 4.0,
        };
        let params = provider.query_params(&bounds);
        let value = |key: &str| {
            params
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.clone())
        };
        assert_eq!(value("limit").as_deref(), Some("20"));
        assert_eq!(value("lang").as_deref(), Some("en"));
        assert_eq!(value("apiKey").as_deref(), Some("test-key"));
        assert_eq!(value("filter").as_deref(), Some("rect:2,1,4,3"));
    }

    #[rstest]
    fn zero_limit_is_raised_to_one(provider: GeoapifyPlaceProvider) {
        assert_eq!(provider.with_limit(0).limit, 1);
    }

    #[rstest]
    fn malformed_payload_maps_to_decode_error() {
        let error = parse_places(b"not json").expect_err("decode should fail");
        assert!(matches!(error, PlaceProviderError::Decode { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn empty_geometry_is_rejected_before_any_request(provider: GeoapifyPlaceProvider) {
        assert_eq!(provider.name(), "Geoapify");
        let error = provider
            .fetch_places(&RouteGeometry::decode(""))
            .await
            .expect_err("empty geometry cannot be queried");
        assert!(matches!(error, PlaceProviderError::InvalidRequest { .. }));
    }
}
