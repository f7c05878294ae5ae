//! Places along a route.
//!
//! ```text
//! GET /api/v1/routes/{route_id}/places?category=&minRating=&maxDetourKm=&limit=&offset=
//! ```
//!
//! Responds with a JSON array of places; an empty array when nothing was
//! found. An unrecognised `category` is ignored rather than rejected.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use tracing::debug;

use crate::domain::{Error, PlaceCategory, PlaceFilterCriteria};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_f64, parse_optional_i64, require_path_segment,
};

const ROUTE_ID: FieldName = FieldName::new("routeId");
const MIN_RATING: FieldName = FieldName::new("minRating");
const MAX_DETOUR_KM: FieldName = FieldName::new("maxDetourKm");
const LIMIT: FieldName = FieldName::new("limit");
const OFFSET: FieldName = FieldName::new("offset");

/// Raw query string for the places endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacesQueryParams {
    pub category: Option<String>,
    pub min_rating: Option<String>,
    pub max_detour_km: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl TryFrom<PlacesQueryParams> for PlaceFilterCriteria {
    type Error = Error;

    fn try_from(params: PlacesQueryParams) -> Result<Self, Self::Error> {
        Ok(Self {
            category: parse_category(params.category.as_deref()),
            min_rating: parse_optional_f64(params.min_rating.as_deref(), MIN_RATING)?,
            max_detour_km: parse_optional_f64(params.max_detour_km.as_deref(), MAX_DETOUR_KM)?,
            limit: parse_optional_i64(params.limit.as_deref(), LIMIT)?,
            offset: parse_optional_i64(params.offset.as_deref(), OFFSET)?,
        })
    }
}

fn parse_category(raw: Option<&str>) -> Option<PlaceCategory> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
    match raw.parse() {
        Ok(category) => Some(category),
        Err(error) => {
            debug!(%error, "ignoring unknown category filter");
            None
        }
    }
}

/// List the places along a route.
#[get("/routes/{route_id}/places")]
pub async fn get_route_places(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<PlacesQueryParams>,
) -> ApiResult<HttpResponse> {
    let route_id = path.into_inner();
    require_path_segment(&route_id, ROUTE_ID)?;
    let criteria = PlaceFilterCriteria::try_from(query.into_inner())?;

    let places = state.places.places_for_route(&route_id, &criteria).await?;
    Ok(HttpResponse::Ok().json(places))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::MockRoutePlacesQuery;
    use crate::domain::{ErrorCode, Place};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn app_state(places: MockRoutePlacesQuery) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(Arc::new(places)))
    }

    async fn call(state: web::Data<HttpState>, uri: &str) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/api/v1").service(get_route_places)),
        )
        .await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        let body: Value = actix_test::read_body_json(res).await;
        (status, body)
    }

    #[rstest]
    #[case::empty(PlacesQueryParams::default(), PlaceFilterCriteria::default())]
    #[case::unknown_category(
        PlacesQueryParams { category: Some("volcano".into()), ..PlacesQueryParams::default() },
        PlaceFilterCriteria::default()
    )]
    #[case::lower_case_category(
        PlacesQueryParams { category: Some("cafe".into()), ..PlacesQueryParams::default() },
        PlaceFilterCriteria { category: Some(PlaceCategory::Cafe), ..PlaceFilterCriteria::default() }
    )]
    #[case::all_fields(
        PlacesQueryParams {
            category: Some("FUEL".into()),
            min_rating: Some("4".into()),
            max_detour_km: Some("2.5".into()),
            limit: Some("2".into()),
            offset: Some("1".into()),
        },
        PlaceFilterCriteria {
            category: Some(PlaceCategory::Fuel),
            min_rating: Some(4.0),
            max_detour_km: Some(2.5),
            limit: Some(2),
            offset: Some(1),
        }
    )]
    fn query_params_become_criteria(
        #[case] params: PlacesQueryParams,
        #[case] expected: PlaceFilterCriteria,
    ) {
        assert_eq!(PlaceFilterCriteria::try_from(params).expect("valid"), expected);
    }

    #[actix_web::test]
    async fn returns_places_as_json_array() {
        let mut query = MockRoutePlacesQuery::new();
        query
            .expect_places_for_route()
            .withf(|route_id, criteria| {
                route_id == "r-7"
                    && criteria.category == Some(PlaceCategory::Cafe)
                    && criteria.limit == Some(1)
            })
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    Place::new("Overpass:1", "Kahve", PlaceCategory::Cafe, 36.9, 30.7, None)
                        .with_detour(0.4),
                ])
            });

        let (status, body) = call(
            app_state(query),
            "/api/v1/routes/r-7/places?category=CAFE&limit=1",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{
                "id": "Overpass:1",
                "name": "Kahve",
                "category": "CAFE",
                "latitude": 36.9,
                "longitude": 30.7,
                "rating": null,
                "detourKm": 0.4
            }])
        );
    }

    #[actix_web::test]
    async fn empty_results_are_an_empty_array() {
        let mut query = MockRoutePlacesQuery::new();
        query
            .expect_places_for_route()
            .returning(|_, _| Ok(Vec::new()));

        let (status, body) = call(app_state(query), "/api/v1/routes/r-1/places").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn malformed_numbers_are_rejected_before_the_query_runs() {
        let mut query = MockRoutePlacesQuery::new();
        query.expect_places_for_route().never();

        let (status, body) = call(
            app_state(query),
            "/api/v1/routes/r-1/places?maxDetourKm=far",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("invalid_request"));
        assert_eq!(body["details"]["field"], json!("maxDetourKm"));
    }

    #[rstest]
    #[case::not_found(Error::not_found("route r-1 not found"), StatusCode::NOT_FOUND)]
    #[case::unavailable(
        Error::service_unavailable("route service unavailable"),
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[case::invalid(Error::invalid_request("bad route id"), StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn domain_errors_map_to_statuses(#[case] error: Error, #[case] expected: StatusCode) {
        let code = error.code();
        let mut query = MockRoutePlacesQuery::new();
        query
            .expect_places_for_route()
            .withf(|route_id, _| route_id == "r-1")
            .returning(move |_, _| Err(error.clone()));

        let (status, body) = call(app_state(query), "/api/v1/routes/r-1/places").await;
        assert_eq!(status, expected);
        let decoded: Error = serde_json::from_value(body).expect("error envelope");
        assert_eq!(decoded.code(), code);
        assert_ne!(code, ErrorCode::InternalError);
    }
}
