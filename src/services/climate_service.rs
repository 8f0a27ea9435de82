use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::db::{
    MeasurementFilter, MeasurementStore, PrecipitationPoint, StationActivity,
    TemperatureObservation, TemperatureStats,
};
use crate::error::QueryError;
use crate::services::aggregates;
use crate::validation::validate_date;

/// Answers climate questions over a read-only measurement store
///
/// Every call reads the store again; nothing is cached between calls.
#[derive(Clone)]
pub struct ClimateService {
    store: Arc<dyn MeasurementStore>,
}

impl ClimateService {
    pub fn new(store: Arc<dyn MeasurementStore>) -> Self {
        Self { store }
    }

    /// Most recent measurement date in the dataset
    pub async fn latest_date(&self) -> Result<NaiveDate, QueryError> {
        self.store
            .latest_measurement_date()
            .await?
            .ok_or(QueryError::EmptyDataset)
    }

    /// Start of the rolling one-year window: latest date minus 365 days
    pub async fn one_year_window_start(&self) -> Result<NaiveDate, QueryError> {
        let latest = self.latest_date().await?;
        Ok(aggregates::one_year_window_start(latest))
    }

    /// One precipitation value per date for dates strictly after `since`
    pub async fn precipitation_since(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<PrecipitationPoint>, QueryError> {
        let measurements = self
            .store
            .scan_measurements(&MeasurementFilter::after(since))
            .await?;

        Ok(aggregates::precipitation_by_date(&measurements))
    }

    pub async fn precipitation_last_year(&self) -> Result<Vec<PrecipitationPoint>, QueryError> {
        let since = self.one_year_window_start().await?;
        self.precipitation_since(since).await
    }

    /// All stations ranked by temperature observation count
    pub async fn station_activity(&self) -> Result<Vec<StationActivity>, QueryError> {
        let counts = self.store.observation_counts().await?;
        Ok(aggregates::rank_station_activity(counts))
    }

    /// Station with the most temperature observations
    ///
    /// Equal counts are broken by the lowest station id.
    pub async fn most_active_station(&self) -> Result<String, QueryError> {
        self.station_activity()
            .await?
            .into_iter()
            .next()
            .map(|activity| activity.station)
            .ok_or(QueryError::EmptyDataset)
    }

    /// Every temperature observation of the most active station after `since`
    pub async fn temperature_observations_for_most_active_station_since(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<TemperatureObservation>, QueryError> {
        let station = self.most_active_station().await?;
        let measurements = self
            .store
            .scan_measurements(&MeasurementFilter::after(since).for_station(&station))
            .await?;

        Ok(aggregates::temperature_observations(&measurements))
    }

    pub async fn most_active_station_temps_last_year(
        &self,
    ) -> Result<Vec<TemperatureObservation>, QueryError> {
        let since = self.one_year_window_start().await?;
        self.temperature_observations_for_most_active_station_since(since)
            .await
    }

    /// Min, mean and max temperature across all stations within
    /// `[start, end]`
    ///
    /// An inverted or uncovered range yields `None` rather than an error.
    pub async fn temperature_stats(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<TemperatureStats>, QueryError> {
        let measurements = self
            .store
            .scan_measurements(&MeasurementFilter::between(start, end))
            .await?;

        Ok(aggregates::temperature_stats(&measurements))
    }

    /// Validate raw date arguments, then compute temperature stats
    ///
    /// A missing end bound means `today`, even when that lies outside the
    /// dataset's coverage.
    pub async fn temperature_stats_for_input(
        &self,
        start: &str,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<(NaiveDate, NaiveDate, Option<TemperatureStats>), QueryError> {
        let start = validate_date(start)?;
        let end = match end {
            Some(end) => validate_date(end)?,
            None => today,
        };

        let stats = self.temperature_stats(start, end).await?;
        Ok((start, end, stats))
    }

    pub async fn distinct_station_names(&self) -> Result<BTreeSet<String>, QueryError> {
        let stations = self.store.scan_stations().await?;
        Ok(aggregates::distinct_station_names(&stations))
    }
}
