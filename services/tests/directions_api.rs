mod common;

use std::time::Duration;

use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};
use services::{DirectionsApi, DirectionsClient, Planned, RoutePlanner};
use shared::{Point, Profile, RouteError};

const API_KEY: &str = "test-key";

async fn directions_stub(
    Path(profile): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Access to this API has been disallowed"})),
        );
    }
    if body["elevation"] != json!(true) || body["units"] != json!("m") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 2003, "message": "bad body"}})),
        );
    }
    match profile.as_str() {
        "foot-hiking" => {
            let start = &body["coordinates"][0];
            let end = &body["coordinates"][1];
            let coordinates = json!([
                [start[0], start[1], 120.0],
                [9.05, 45.05, 260.0],
                [end[0], end[1], 250.0]
            ]);
            (StatusCode::OK, Json(common::route_feature_collection(coordinates)))
        }
        "cycling-road" => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": 2010, "message": "Could not find routable point"}})),
        ),
        _ => (StatusCode::OK, Json(json!({"type": "FeatureCollection", "features": []}))),
    }
}

async fn client() -> DirectionsClient {
    let app = Router::new().route("/v2/directions/:profile/geojson", post(directions_stub));
    let base = common::spawn_stub(app).await;
    DirectionsClient::new(format!("{base}/v2/directions"), API_KEY, reqwest::Client::new())
}

#[tokio::test]
async fn hiking_route_returns_geometry_and_summary() {
    let client = client().await;
    let route = client
        .fetch_route(Point::new(9.0, 45.0), Point::new(9.1, 45.1), Profile::Hiking)
        .await
        .expect("route");

    assert!(route.geometry.len() >= 2);
    assert!(route.summary.distance_m >= 0.0);
    assert!(route.summary.duration_s >= 0.0);
    assert_eq!(route.summary.ascent_m, 150.0);
    assert_eq!(route.summary.surface[0].label(), "Ground");
    assert_eq!(route.summary.elevation_profile().max_elevation, Some(260.0));
}

#[tokio::test]
async fn server_rejection_keeps_status_and_message() {
    let client = client().await;
    let err = client
        .fetch_route(Point::new(9.0, 45.0), Point::new(9.1, 45.1), Profile::RoadCycling)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RouteError::Rejected {
            status: 404,
            message: Some("Could not find routable point".into()),
        }
    );
}

#[tokio::test]
async fn wrong_key_is_rejected() {
    let app = Router::new().route("/v2/directions/:profile/geojson", post(directions_stub));
    let base = common::spawn_stub(app).await;
    let client = DirectionsClient::new(format!("{base}/v2/directions"), "nope", reqwest::Client::new());
    let err = client
        .fetch_route(Point::new(9.0, 45.0), Point::new(9.1, 45.1), Profile::Hiking)
        .await
        .unwrap_err();
    assert!(matches!(err, RouteError::Rejected { status: 403, .. }));
}

#[tokio::test]
async fn empty_feature_collection_is_malformed() {
    let client = client().await;
    let err = client
        .fetch_route(Point::new(9.0, 45.0), Point::new(9.1, 45.1), Profile::Driving)
        .await
        .unwrap_err();
    assert!(matches!(err, RouteError::Malformed(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let addr = common::dead_address().await;
    let client = DirectionsClient::new(
        format!("http://{addr}/v2/directions"),
        API_KEY,
        reqwest::Client::new(),
    );
    let err = client
        .fetch_route(Point::new(9.0, 45.0), Point::new(9.1, 45.1), Profile::Hiking)
        .await
        .unwrap_err();
    assert!(matches!(err, RouteError::Network(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn slow_server_times_out_as_network_error() {
    async fn slow() -> Json<Value> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(json!({}))
    }
    let app = Router::new().route("/v2/directions/:profile/geojson", post(slow));
    let base = common::spawn_stub(app).await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let client = DirectionsClient::new(format!("{base}/v2/directions"), API_KEY, http);

    let err = client
        .fetch_route(Point::new(9.0, 45.0), Point::new(9.1, 45.1), Profile::Hiking)
        .await
        .unwrap_err();
    assert_eq!(err, RouteError::Network("request timed out".into()));
}

#[tokio::test]
async fn planner_over_http_returns_current_result() {
    let planner = RoutePlanner::new(client().await);
    let planned = planner
        .plan(Point::new(9.0, 45.0), Point::new(9.1, 45.1), Profile::Hiking)
        .await;
    assert!(matches!(planned, Planned::Current(Ok(_))));
}
