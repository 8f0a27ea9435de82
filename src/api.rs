use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};
use utoipa::{OpenApi, ToSchema};

use crate::db::TemperatureObservation;
use crate::error::QueryError;
use crate::services::ClimateService;

pub const API_PREFIX: &str = "/api/v1.0";

#[derive(Clone)]
pub struct AppState {
    pub climate_service: ClimateService,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

/// Temperature summary for an inclusive date range; the statistics are
/// null when no measurement falls inside the range
#[derive(Debug, Serialize, ToSchema)]
pub struct TemperatureRangeResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, precipitation, stations, tobs, temperature_from, temperature_range),
    components(schemas(
        HealthResponse,
        ErrorResponse,
        TemperatureRangeResponse,
        TemperatureObservation
    )),
    tags((name = "climate", description = "Climate analysis over the measurement dataset"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/precipitation", get(precipitation))
        .route("/stations", get(stations))
        .route("/tobs", get(tobs))
        .route("/{start}", get(temperature_from))
        .route("/{start}/{end}", get(temperature_range))
        .with_state(state);

    Router::new()
        .route("/", get(welcome))
        .nest(API_PREFIX, api_routes)
}

async fn welcome() -> String {
    format!(
        "Available Routes:\n\
         {API_PREFIX}/precipitation\n\
         {API_PREFIX}/stations\n\
         {API_PREFIX}/tobs\n\
         {API_PREFIX}/<start>\n\
         {API_PREFIX}/<start>/<end>\n"
    )
}

#[utoipa::path(
    get,
    path = "/api/v1.0/health",
    tag = "climate",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[instrument(skip(_state))]
async fn health(State(_state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    tag = "climate",
    responses(
        (status = 200, description = "Precipitation per date over the last year of data; later rows win when stations share a date", body = BTreeMap<String, Option<f64>>),
        (status = 500, description = "Measurement store failure")
    )
)]
#[instrument(skip(state))]
async fn precipitation(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<NaiveDate, Option<f64>>>, StatusCode> {
    debug!("Fetching precipitation for the last year of data");
    let points = match state.climate_service.precipitation_last_year().await {
        Ok(points) => points,
        Err(QueryError::EmptyDataset) => {
            warn!("No measurements available, returning empty precipitation series");
            Vec::new()
        }
        Err(e) => {
            error!("Failed to fetch precipitation: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    info!("Retrieved precipitation for {} dates", points.len());

    Ok(Json(
        points.into_iter().map(|p| (p.date, p.prcp)).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    tag = "climate",
    responses(
        (status = 200, description = "Distinct station names", body = Vec<String>),
        (status = 500, description = "Measurement store failure")
    )
)]
#[instrument(skip(state))]
async fn stations(State(state): State<AppState>) -> Result<Json<Vec<String>>, StatusCode> {
    debug!("Fetching distinct station names");
    let names = state
        .climate_service
        .distinct_station_names()
        .await
        .map_err(|e| {
            error!("Failed to fetch station names: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    info!("Retrieved {} distinct station names", names.len());
    Ok(Json(names.into_iter().collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    tag = "climate",
    responses(
        (status = 200, description = "Last year of temperature observations from the most active station", body = Vec<TemperatureObservation>),
        (status = 500, description = "Measurement store failure")
    )
)]
#[instrument(skip(state))]
async fn tobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemperatureObservation>>, StatusCode> {
    debug!("Fetching last year of observations for the most active station");
    let observations = match state.climate_service.most_active_station_temps_last_year().await {
        Ok(observations) => observations,
        Err(QueryError::EmptyDataset) => {
            warn!("No measurements available, returning empty observation list");
            Vec::new()
        }
        Err(e) => {
            error!("Failed to fetch temperature observations: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    info!("Retrieved {} temperature observations", observations.len());
    Ok(Json(observations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    tag = "climate",
    params(("start" = String, Path, description = "Inclusive start date, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Temperature stats from start through today", body = TemperatureRangeResponse),
        (status = 400, description = "Malformed date", body = ErrorResponse),
        (status = 500, description = "Measurement store failure")
    )
)]
#[instrument(skip(state), fields(start = %start))]
async fn temperature_from(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<TemperatureRangeResponse>, (StatusCode, Json<ErrorResponse>)> {
    temperature_stats_response(&state, &start, None).await
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    tag = "climate",
    params(
        ("start" = String, Path, description = "Inclusive start date, YYYY-MM-DD"),
        ("end" = String, Path, description = "Inclusive end date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Temperature stats for the range", body = TemperatureRangeResponse),
        (status = 400, description = "Malformed date", body = ErrorResponse),
        (status = 500, description = "Measurement store failure")
    )
)]
#[instrument(skip(state), fields(start = %start, end = %end))]
async fn temperature_range(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<TemperatureRangeResponse>, (StatusCode, Json<ErrorResponse>)> {
    temperature_stats_response(&state, &start, Some(&end)).await
}

async fn temperature_stats_response(
    state: &AppState,
    start: &str,
    end: Option<&str>,
) -> Result<Json<TemperatureRangeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let today = Local::now().date_naive();
    debug!("Computing temperature stats from {} to {:?} (today {})", start, end, today);

    let (start, end, stats) = state
        .climate_service
        .temperature_stats_for_input(start, end, today)
        .await
        .map_err(|e| match e {
            QueryError::InvalidDateFormat(invalid) => {
                warn!("Rejected temperature range request: {}", invalid);
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Invalid Input".to_string(),
                        detail: invalid.to_string(),
                    }),
                )
            }
            e => {
                error!("Failed to compute temperature stats: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        detail: e.to_string(),
                    }),
                )
            }
        })?;

    match &stats {
        Some(stats) => info!(
            "Temperature stats {} to {}: min {:.1}, avg {:.1}, max {:.1}",
            start, end, stats.min, stats.avg, stats.max
        ),
        None => info!("No measurements between {} and {}", start, end),
    }

    Ok(Json(TemperatureRangeResponse {
        start,
        end,
        min: stats.map(|s| s.min),
        avg: stats.map(|s| s.avg),
        max: stats.map(|s| s.max),
    }))
}
