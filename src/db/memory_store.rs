use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{DbError, Measurement, MeasurementFilter, MeasurementStore, Station};

/// Measurement store backed by immutable in-process vectors
///
/// Rows keep the order they were given in, which stands in for the storage
/// row order of a database table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMeasurementStore {
    measurements: Arc<Vec<Measurement>>,
    stations: Arc<Vec<Station>>,
}

impl InMemoryMeasurementStore {
    pub fn new(measurements: Vec<Measurement>, stations: Vec<Station>) -> Self {
        Self {
            measurements: Arc::new(measurements),
            stations: Arc::new(stations),
        }
    }
}

#[async_trait]
impl MeasurementStore for InMemoryMeasurementStore {
    async fn scan_measurements(
        &self,
        filter: &MeasurementFilter,
    ) -> Result<Vec<Measurement>, DbError> {
        let mut rows: Vec<Measurement> = self
            .measurements
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();

        // Stable sort keeps insertion order among rows sharing a date
        rows.sort_by_key(|m| m.date);
        Ok(rows)
    }

    async fn scan_stations(&self) -> Result<Vec<Station>, DbError> {
        Ok(self.stations.as_ref().clone())
    }
}
