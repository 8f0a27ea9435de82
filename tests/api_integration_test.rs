// API integration tests that verify HTTP endpoints
// Drives the Axum router directly with an in-memory measurement store

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Local;
use http_body_util::BodyExt; // For `.collect()`
use climate_query_service::api::{create_router, generate_openapi_spec, AppState};
use climate_query_service::db::{InMemoryMeasurementStore, Measurement, Station};
use climate_query_service::services::ClimateService;
use common::{date, sample_measurements, sample_stations};
use serde_json::{json, Value};
use tower::ServiceExt; // For `oneshot`

fn create_test_app(measurements: Vec<Measurement>, stations: Vec<Station>) -> axum::Router {
    let store = InMemoryMeasurementStore::new(measurements, stations);
    let state = AppState {
        climate_service: ClimateService::new(Arc::new(store)),
    };
    create_router(state)
}

fn sample_app() -> axum::Router {
    create_test_app(sample_measurements(), sample_stations())
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    let json = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_welcome_lists_routes() {
    let (status, body) = get(sample_app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("/api/v1.0/precipitation"));
    assert!(text.contains("/api/v1.0/<start>/<end>"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = get_json(sample_app(), "/api/v1.0/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_precipitation_endpoint() {
    let (status, json) = get_json(sample_app(), "/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "2016-08-24": 2.15,
            "2017-02-28": 0.0,
            "2017-08-18": 0.06,
            "2017-08-23": 0.0
        })
    );
}

#[tokio::test]
async fn test_precipitation_passes_nulls_through() {
    let app = create_test_app(
        vec![
            Measurement::new("StationA", date("2017-08-22"), Some(0.1), 78.0),
            Measurement::new("StationB", date("2017-08-23"), None, 80.0),
        ],
        vec![],
    );

    let (status, json) = get_json(app, "/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "2017-08-22": 0.1, "2017-08-23": null }));
}

#[tokio::test]
async fn test_stations_endpoint() {
    let (status, json) = get_json(sample_app(), "/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!([
            "KANEOHE 838.1, HI US",
            "WAIHEE 837.5, HI US",
            "WAIKIKI 717.2, HI US"
        ])
    );
}

#[tokio::test]
async fn test_tobs_endpoint() {
    let (status, json) = get_json(sample_app(), "/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!([
            { "date": "2016-08-24", "tobs": 77.0 },
            { "date": "2017-02-28", "tobs": 72.0 },
            { "date": "2017-08-18", "tobs": 79.0 }
        ])
    );
}

#[tokio::test]
async fn test_tobs_omits_null_readings() {
    let app = create_test_app(
        vec![
            Measurement::new("USC1", date("2017-08-21"), None, 75.0),
            Measurement::new("USC1", date("2017-08-22"), None, None::<f64>),
            Measurement::new("USC1", date("2017-08-23"), None, 77.0),
        ],
        vec![],
    );

    let (status, json) = get_json(app, "/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!([
            { "date": "2017-08-21", "tobs": 75.0 },
            { "date": "2017-08-23", "tobs": 77.0 }
        ])
    );
}

#[tokio::test]
async fn test_empty_dataset_is_degraded_not_error() {
    let (status, json) = get_json(create_test_app(vec![], vec![]), "/api/v1.0/precipitation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({}));

    let (status, json) = get_json(create_test_app(vec![], vec![]), "/api/v1.0/tobs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));

    let (status, json) = get_json(create_test_app(vec![], vec![]), "/api/v1.0/stations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_temperature_range_endpoint() {
    let (status, json) = get_json(sample_app(), "/api/v1.0/2017-02-28/2017-02-28").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "start": "2017-02-28",
            "end": "2017-02-28",
            "min": 69.0,
            "avg": 70.5,
            "max": 72.0
        })
    );
}

#[tokio::test]
async fn test_temperature_start_only_runs_through_today() {
    let (status, json) = get_json(sample_app(), "/api/v1.0/2017-08-18").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["start"], "2017-08-18");

    // The end bound is the wall clock date, not the dataset's latest date.
    // Allow for the date rolling over between the request and this check.
    let end = json["end"].as_str().unwrap().to_string();
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    assert!(end == today || end < today, "unexpected end {end}");
    assert_eq!(json["min"], 79.0);
    assert_eq!(json["max"], 81.0);
    assert_eq!(json["avg"], 80.0);
}

#[tokio::test]
async fn test_temperature_inverted_range_is_empty() {
    let (status, json) = get_json(sample_app(), "/api/v1.0/2017-08-23/2016-08-23").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["min"], Value::Null);
    assert_eq!(json["avg"], Value::Null);
    assert_eq!(json["max"], Value::Null);
}

#[tokio::test]
async fn test_temperature_out_of_coverage_is_empty() {
    let (status, json) = get_json(sample_app(), "/api/v1.0/1990-01-01/1990-12-31").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["min"], Value::Null);
}

#[tokio::test]
async fn test_temperature_invalid_start() {
    let (status, json) = get_json(sample_app(), "/api/v1.0/08-23-2017").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid Input");
    assert!(json["detail"].as_str().unwrap().contains("08-23-2017"));
}

#[tokio::test]
async fn test_temperature_invalid_end() {
    let (status, json) = get_json(sample_app(), "/api/v1.0/2017-01-01/2017-02-30").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid Input");
}

#[tokio::test]
async fn test_unknown_nested_route_not_found() {
    let (status, _) = get(sample_app(), "/api/v1.0/2017-01-01/2017-02-01/extra").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn test_openapi_lists_all_routes() {
    let spec = generate_openapi_spec();
    let json = serde_json::to_value(&spec).unwrap();
    let paths = json["paths"].as_object().unwrap();

    for path in [
        "/api/v1.0/health",
        "/api/v1.0/precipitation",
        "/api/v1.0/stations",
        "/api/v1.0/tobs",
        "/api/v1.0/{start}",
        "/api/v1.0/{start}/{end}",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}

#[test]
fn test_openapi_precipitation_values_are_nullable() {
    let spec = generate_openapi_spec();
    let json = serde_json::to_value(&spec).unwrap();

    let schema = &json["paths"]["/api/v1.0/precipitation"]["get"]["responses"]["200"]["content"]
        ["application/json"]["schema"];

    assert_eq!(schema["type"], "object");
    assert_eq!(schema["additionalProperties"]["nullable"], true);
}
