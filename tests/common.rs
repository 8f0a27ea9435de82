#![allow(dead_code)]

use std::str::FromStr;

use chrono::NaiveDate;
use climate_query_service::db::{pool, Measurement, SqliteMeasurementStore, Station};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// SQLite measurement database in a temporary directory
///
/// The directory is removed when this is dropped, so keep it alive for the
/// duration of the test.
pub struct TestDatabase {
    _dir: TempDir,
    pub url: String,
}

impl TestDatabase {
    /// Create the schema and load the given rows, in order
    pub async fn create(measurements: &[Measurement], stations: &[Station]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", dir.path().join("climate.sqlite").display());

        let options = SqliteConnectOptions::from_str(&url)
            .expect("Invalid test database url")
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        insert_stations(&pool, stations).await;
        insert_measurements(&pool, measurements).await;
        pool.close().await;

        Self { _dir: dir, url }
    }

    /// Open the database the way the service does: read-only, pooled
    pub async fn store(&self) -> SqliteMeasurementStore {
        let pool = pool::connect(&self.url, 4)
            .await
            .expect("Failed to open test database");
        SqliteMeasurementStore::new(pool)
    }
}

async fn insert_stations(pool: &SqlitePool, stations: &[Station]) {
    for station in stations {
        sqlx::query(
            r#"
            INSERT INTO station (station, name, latitude, longitude, elevation)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&station.id)
        .bind(&station.name)
        .bind(station.latitude)
        .bind(station.longitude)
        .bind(station.elevation)
        .execute(pool)
        .await
        .expect("Failed to insert station");
    }
}

async fn insert_measurements(pool: &SqlitePool, measurements: &[Measurement]) {
    for measurement in measurements {
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
            .bind(&measurement.station_id)
            .bind(measurement.date)
            .bind(measurement.prcp)
            .bind(measurement.tobs)
            .execute(pool)
            .await
            .expect("Failed to insert measurement");
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("Invalid test date")
}

/// Small slice of the Hawaii dataset shape: three stations, one of them
/// clearly the most active, with a shared-date precipitation collision
pub fn sample_measurements() -> Vec<Measurement> {
    vec![
        Measurement::new("USC00519397", date("2010-01-01"), Some(0.08), 65.0),
        Measurement::new("USC00519281", date("2016-08-22"), Some(0.4), 77.0),
        Measurement::new("USC00519281", date("2016-08-23"), Some(1.79), 77.0),
        Measurement::new("USC00519397", date("2016-08-24"), Some(0.08), 79.0),
        Measurement::new("USC00519281", date("2016-08-24"), Some(2.15), 77.0),
        Measurement::new("USC00513117", date("2017-02-28"), None, 69.0),
        Measurement::new("USC00519281", date("2017-02-28"), Some(0.0), 72.0),
        Measurement::new("USC00519281", date("2017-08-18"), Some(0.06), 79.0),
        Measurement::new("USC00519397", date("2017-08-23"), Some(0.0), 81.0),
    ]
}

pub fn sample_stations() -> Vec<Station> {
    vec![
        Station::new("USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0),
        Station::new("USC00513117", "KANEOHE 838.1, HI US", 21.4234, -157.8015, 14.6),
        Station::new("USC00519281", "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9),
        Station::new("USC00519282", "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9),
    ]
}
