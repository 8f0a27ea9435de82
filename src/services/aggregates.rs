//! Pure aggregations over rows already read from a measurement store.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};

use crate::db::{
    Measurement, PrecipitationPoint, Station, StationActivity, TemperatureObservation,
    TemperatureStats,
};

/// Length of the rolling window in whole days; leap days are not added
pub const ONE_YEAR_DAYS: i64 = 365;

pub fn latest_date(measurements: &[Measurement]) -> Option<NaiveDate> {
    measurements.iter().map(|m| m.date).max()
}

/// First day of the rolling one-year window ending at `latest`
pub fn one_year_window_start(latest: NaiveDate) -> NaiveDate {
    latest - Duration::days(ONE_YEAR_DAYS)
}

/// Collapse a date-ordered series to one precipitation value per date
///
/// When several rows share a date the one encountered last wins, including
/// a null that follows a reported value.
pub fn precipitation_by_date(measurements: &[Measurement]) -> Vec<PrecipitationPoint> {
    let mut by_date: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
    for measurement in measurements {
        by_date.insert(measurement.date, measurement.prcp);
    }

    by_date
        .into_iter()
        .map(|(date, prcp)| PrecipitationPoint { date, prcp })
        .collect()
}

/// Order stations by observation count descending, then station id ascending
pub fn rank_station_activity(mut activity: Vec<StationActivity>) -> Vec<StationActivity> {
    activity.sort_by(|a, b| {
        Reverse(a.observation_count)
            .cmp(&Reverse(b.observation_count))
            .then_with(|| a.station.cmp(&b.station))
    });
    activity
}

/// Rows without a temperature reading are skipped
pub fn temperature_observations(measurements: &[Measurement]) -> Vec<TemperatureObservation> {
    measurements
        .iter()
        .filter_map(|m| m.tobs.map(|tobs| TemperatureObservation { date: m.date, tobs }))
        .collect()
}

/// Min, mean and max of the non-null temperatures, `None` when there are none
pub fn temperature_stats(measurements: &[Measurement]) -> Option<TemperatureStats> {
    let mut readings = measurements.iter().filter_map(|m| m.tobs);
    let first = readings.next()?;

    let (min, max, sum, count) = readings.fold(
        (first, first, first, 1usize),
        |(min, max, sum, count), tobs| (min.min(tobs), max.max(tobs), sum + tobs, count + 1),
    );

    Some(TemperatureStats {
        min,
        avg: sum / count as f64,
        max,
    })
}

/// Station names with duplicates across station ids removed
pub fn distinct_station_names(stations: &[Station]) -> BTreeSet<String> {
    stations.iter().map(|s| s.name.clone()).collect()
}
