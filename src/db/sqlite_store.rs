use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, instrument};

use crate::db::{
    DbError, Measurement, MeasurementFilter, MeasurementStore, Station, StationActivity,
};

/// Measurement store over the `measurement` and `station` tables of a
/// SQLite database
#[derive(Clone)]
pub struct SqliteMeasurementStore {
    pool: SqlitePool,
}

impl SqliteMeasurementStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl MeasurementStore for SqliteMeasurementStore {
    #[instrument(skip(self))]
    async fn scan_measurements(
        &self,
        filter: &MeasurementFilter,
    ) -> Result<Vec<Measurement>, DbError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT station AS station_id, date, prcp, tobs
            FROM measurement
            WHERE 1 = 1
            "#,
        );

        if let Some(station_id) = &filter.station_id {
            query.push(" AND station = ").push_bind(station_id.clone());
        }
        if let Some(after) = filter.after {
            query.push(" AND date > ").push_bind(after);
        }
        if let Some(from) = filter.from {
            query.push(" AND date >= ").push_bind(from);
        }
        if let Some(through) = filter.through {
            query.push(" AND date <= ").push_bind(through);
        }
        query.push(" ORDER BY date ASC, id ASC");

        let measurements = query
            .build_query_as::<Measurement>()
            .fetch_all(&self.pool)
            .await?;

        debug!("Found {} measurements", measurements.len());
        Ok(measurements)
    }

    #[instrument(skip(self))]
    async fn scan_stations(&self) -> Result<Vec<Station>, DbError> {
        let stations = sqlx::query_as::<_, Station>(
            r#"
            SELECT station AS id, name, latitude, longitude, elevation
            FROM station
            ORDER BY station ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} stations", stations.len());
        Ok(stations)
    }

    #[instrument(skip(self))]
    async fn latest_measurement_date(&self) -> Result<Option<NaiveDate>, DbError> {
        let latest = sqlx::query_scalar::<_, Option<NaiveDate>>("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;

        match latest {
            Some(date) => debug!("Latest measurement date is {}", date),
            None => debug!("No measurements found in database"),
        }
        Ok(latest)
    }

    #[instrument(skip(self))]
    async fn observation_counts(&self) -> Result<Vec<StationActivity>, DbError> {
        let counts = sqlx::query_as::<_, StationActivity>(
            r#"
            SELECT station, COUNT(tobs) AS observation_count
            FROM measurement
            WHERE tobs IS NOT NULL
            GROUP BY station
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Counted observations for {} stations", counts.len());
        Ok(counts)
    }
}
