use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::db::{DbError, Measurement, Station, StationActivity};

/// Row predicate pushed down to a measurement store
///
/// All set bounds must hold for a row to match. `after` is exclusive,
/// `from` and `through` are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementFilter {
    pub station_id: Option<String>,
    pub after: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub through: Option<NaiveDate>,
}

impl MeasurementFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Rows strictly later than `date`
    pub fn after(date: NaiveDate) -> Self {
        Self {
            after: Some(date),
            ..Self::default()
        }
    }

    /// Rows within `[start, end]`
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            from: Some(start),
            through: Some(end),
            ..Self::default()
        }
    }

    pub fn for_station(mut self, station_id: &str) -> Self {
        self.station_id = Some(station_id.to_string());
        self
    }

    pub fn matches(&self, measurement: &Measurement) -> bool {
        if let Some(station_id) = &self.station_id {
            if &measurement.station_id != station_id {
                return false;
            }
        }
        if let Some(after) = self.after {
            if measurement.date <= after {
                return false;
            }
        }
        if let Some(from) = self.from {
            if measurement.date < from {
                return false;
            }
        }
        if let Some(through) = self.through {
            if measurement.date > through {
                return false;
            }
        }
        true
    }
}

/// Read-only access to the measurement and station tables
///
/// Implementations return measurements ordered by date ascending, then by
/// the order rows were stored in. The dataset never changes while a store
/// is alive, so repeated calls return the same rows.
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    async fn scan_measurements(
        &self,
        filter: &MeasurementFilter,
    ) -> Result<Vec<Measurement>, DbError>;

    async fn scan_stations(&self) -> Result<Vec<Station>, DbError>;

    /// Most recent measurement date, `None` when there are no measurements
    async fn latest_measurement_date(&self) -> Result<Option<NaiveDate>, DbError> {
        let measurements = self.scan_measurements(&MeasurementFilter::all()).await?;
        Ok(measurements.iter().map(|m| m.date).max())
    }

    /// Non-null temperature observation count per station, in no particular
    /// order; stations with only null readings are omitted
    async fn observation_counts(&self) -> Result<Vec<StationActivity>, DbError> {
        let measurements = self.scan_measurements(&MeasurementFilter::all()).await?;

        let mut counts: HashMap<&str, i64> = HashMap::new();
        for measurement in measurements.iter().filter(|m| m.tobs.is_some()) {
            *counts.entry(measurement.station_id.as_str()).or_insert(0) += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(station, observation_count)| StationActivity {
                station: station.to_string(),
                observation_count,
            })
            .collect())
    }
}
