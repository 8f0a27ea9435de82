use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Database entity models
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Measurement {
    pub station_id: String,
    pub date: NaiveDate,
    pub prcp: Option<f64>,
    pub tobs: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// Number of temperature observations reported by one station
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct StationActivity {
    pub station: String,
    pub observation_count: i64,
}

// API response DTOs (to avoid circular dependency between services and api modules)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationPoint {
    pub date: NaiveDate,
    pub prcp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TemperatureObservation {
    pub date: NaiveDate,
    pub tobs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureStats {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl Measurement {
    pub fn new(
        station_id: &str,
        date: NaiveDate,
        prcp: Option<f64>,
        tobs: impl Into<Option<f64>>,
    ) -> Self {
        Self {
            station_id: station_id.to_string(),
            date,
            prcp,
            tobs: tobs.into(),
        }
    }
}

impl Station {
    pub fn new(id: &str, name: &str, latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            elevation,
        }
    }
}
