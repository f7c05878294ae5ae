//! Integration guardrails for the outbound adapters.
//!
//! Stub upstreams for the route service, Overpass and Geoapify listen on real
//! sockets; the real reqwest adapters talk to them through the aggregation
//! service and the HTTP handler.

use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, test, web};
use rstest::rstest;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use roadify_places::Trace;
use roadify_places::domain::ports::PlaceProvider;
use roadify_places::domain::normalizer::UNKNOWN_PLACE_NAME;
use roadify_places::domain::{PlacesAggregationService, PlacesServiceConfig, PlacesServicePorts};
use roadify_places::inbound::http::places::get_route_places;
use roadify_places::inbound::http::state::HttpState;
use roadify_places::outbound::cache::InMemoryPlacesCache;
use roadify_places::outbound::geoapify::GeoapifyPlaceProvider;
use roadify_places::outbound::overpass::OverpassPlaceProvider;
use roadify_places::outbound::route_service::HttpRouteLookup;
use roadify_places::test_support::places::RecordingEventSink;

const ROUTE_GEOMETRY: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";
const API_KEY: &str = "test-key";
const CALL_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared state for the stub upstreams.
#[derive(Default)]
struct Upstream {
    overpass_calls: AtomicUsize,
    geoapify_calls: AtomicUsize,
    overpass_rate_limited: AtomicBool,
}

async fn route_summary(path: web::Path<String>) -> HttpResponse {
    let route_id = path.into_inner();
    if route_id == "missing" {
        return HttpResponse::NotFound().finish();
    }
    HttpResponse::Ok().json(json!({
        "id": route_id,
        "distanceKm": 412.5,
        "durationMinutes": 300.0,
        "geometry": ROUTE_GEOMETRY,
    }))
}

#[derive(Deserialize)]
struct OverpassForm {
    data: String,
}

async fn overpass(upstream: web::Data<Upstream>, form: web::Form<OverpassForm>) -> HttpResponse {
    upstream.overpass_calls.fetch_add(1, Ordering::SeqCst);
    if upstream.overpass_rate_limited.load(Ordering::SeqCst) {
        return HttpResponse::TooManyRequests().body("slow down");
    }
    if !form.data.contains("out center tags;") {
        return HttpResponse::BadRequest().body("unexpected query");
    }
    HttpResponse::Ok().json(json!({
        "elements": [
            {
                "type": "node",
                "id": 42,
                "lat": 38.51,
                "lon": -120.21,
                "tags": {"amenity": "fuel", "name": "Ridge Fuel"}
            },
            {
                "type": "way",
                "id": 7,
                "center": {"lat": 38.52, "lon": -120.22},
                "tags": {"tourism": "viewpoint"}
            },
            {"type": "relation", "id": 9, "tags": {"shop": "mall"}}
        ]
    }))
}

async fn geoapify(upstream: web::Data<Upstream>, request: HttpRequest) -> HttpResponse {
    upstream.geoapify_calls.fetch_add(1, Ordering::SeqCst);
    let query = request.query_string();
    if !query.contains(&format!("apiKey={API_KEY}")) {
        return HttpResponse::Unauthorized().finish();
    }
    if !query.contains("filter=rect") {
        return HttpResponse::BadRequest().finish();
    }
    HttpResponse::Ok().json(json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "place_id": "g1",
                    "name": "Summit Cafe",
                    "categories": ["catering", "catering.cafe"],
                    "rating": 4.5
                },
                "geometry": {"type": "Point", "coordinates": [-120.2, 38.5]}
            }
        ]
    }))
}

async fn spawn_upstream(upstream: web::Data<Upstream>) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(upstream.clone())
            .route("/v1/routes/{route_id}", web::get().to(route_summary))
            .route("/overpass", web::post().to(overpass))
            .route("/geoapify", web::get().to(geoapify))
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}

fn endpoint(base: &str, path: &str) -> Url {
    Url::parse(&format!("{base}{path}")).expect("stub endpoint url")
}

fn wire_service(base: &str, events: Arc<RecordingEventSink>) -> web::Data<HttpState> {
    let geoapify = GeoapifyPlaceProvider::new(endpoint(base, "/geoapify"), API_KEY, CALL_TIMEOUT)
        .expect("geoapify client");
    let overpass =
        OverpassPlaceProvider::new(endpoint(base, "/overpass"), CALL_TIMEOUT).expect("overpass client");
    let route_lookup =
        HttpRouteLookup::new(endpoint(base, "/"), CALL_TIMEOUT).expect("route service client");
    let providers: Vec<Arc<dyn PlaceProvider>> = vec![Arc::new(geoapify), Arc::new(overpass)];

    let service = PlacesAggregationService::new(
        PlacesServicePorts {
            providers,
            route_lookup: Arc::new(route_lookup),
            cache: Arc::new(InMemoryPlacesCache::default()),
            events,
        },
        PlacesServiceConfig::default(),
    );
    web::Data::new(HttpState::new(Arc::new(service)))
}

async fn get_places(state: web::Data<HttpState>, route_id: &str) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(Trace)
            .service(web::scope("/api/v1").service(get_route_places)),
    )
    .await;
    let uri = format!("/api/v1/routes/{route_id}/places");
    let res = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

fn ids(body: &Value) -> Vec<&str> {
    body.as_array()
        .expect("response is an array")
        .iter()
        .filter_map(|place| place.get("id").and_then(Value::as_str))
        .collect()
}

#[rstest]
#[actix_web::test]
async fn real_adapters_aggregate_and_cache_upstream_places() {
    let upstream = web::Data::new(Upstream::default());
    let (base, handle) = spawn_upstream(upstream.clone()).await.expect("stub upstream");
    let events = Arc::new(RecordingEventSink::default());
    let state = wire_service(&base, events.clone());

    let (status, body) = get_places(state.clone(), "coast-run").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), ["Geoapify:g1", "Overpass:42", "Overpass:7"]);
    assert_eq!(body[0]["category"], json!("CAFE"));
    assert_eq!(body[0]["rating"], json!(4.5));
    assert_eq!(body[1]["category"], json!("FUEL"));
    assert_eq!(body[2]["name"], json!(UNKNOWN_PLACE_NAME));
    assert_eq!(body[2]["category"], json!("TOURIST"));

    let recorded = events.wait_for(1, CALL_TIMEOUT).await;
    assert_eq!(recorded[0].route_id, "coast-run");
    assert_eq!(recorded[0].total_count, 3);

    let (status, cached) = get_places(state, "coast-run").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cached, body);
    assert_eq!(upstream.overpass_calls.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.geoapify_calls.load(Ordering::SeqCst), 1);

    handle.stop(true).await;
}

#[rstest]
#[actix_web::test]
async fn rate_limited_provider_degrades_without_caching() {
    let upstream = web::Data::new(Upstream::default());
    upstream.overpass_rate_limited.store(true, Ordering::SeqCst);
    let (base, handle) = spawn_upstream(upstream.clone()).await.expect("stub upstream");
    let state = wire_service(&base, Arc::new(RecordingEventSink::default()));

    let (status, body) = get_places(state.clone(), "coast-run").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), ["Geoapify:g1"]);

    let (status, _) = get_places(state, "coast-run").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(upstream.overpass_calls.load(Ordering::SeqCst), 2);
    assert_eq!(upstream.geoapify_calls.load(Ordering::SeqCst), 2);

    handle.stop(true).await;
}

#[rstest]
#[actix_web::test]
async fn unknown_route_skips_providers() {
    let upstream = web::Data::new(Upstream::default());
    let (base, handle) = spawn_upstream(upstream.clone()).await.expect("stub upstream");
    let state = wire_service(&base, Arc::new(RecordingEventSink::default()));

    let (status, body) = get_places(state, "missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("not_found"));
    assert_eq!(upstream.overpass_calls.load(Ordering::SeqCst), 0);
    assert_eq!(upstream.geoapify_calls.load(Ordering::SeqCst), 0);

    handle.stop(true).await;
}
