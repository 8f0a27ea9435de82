//! Run climate queries against a measurement database and print JSON
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde_json::json;

use climate_query_service::db::{pool, SqliteMeasurementStore};
use climate_query_service::services::ClimateService;
use climate_query_service::validation::validate_date;

#[derive(Parser)]
#[command(name = "climate-query")]
#[command(about = "Query precipitation, station activity and temperature ranges", long_about = None)]
struct Cli {
    /// Database connection string
    #[arg(long, env, default_value = "sqlite://Resources/hawaii.sqlite")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Most recent measurement date and the start of the one-year window
    Latest,
    /// One precipitation value per date after --since (default: one-year window start)
    Precipitation {
        #[arg(long, value_parser = parse_date)]
        since: Option<NaiveDate>,
    },
    /// Distinct station names
    Stations,
    /// Stations ranked by temperature observation count
    Activity,
    /// Temperature observations of the most active station after --since
    Tobs {
        #[arg(long, value_parser = parse_date)]
        since: Option<NaiveDate>,
    },
    /// Min, average and max temperature between START and END (default: today)
    Temps { start: String, end: Option<String> },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    validate_date(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let pool = pool::connect(&cli.database_url, 1).await?;
    let service = ClimateService::new(Arc::new(SqliteMeasurementStore::new(pool)));

    let output = match cli.command {
        Command::Latest => json!({
            "latest_date": service.latest_date().await?,
            "one_year_window_start": service.one_year_window_start().await?,
        }),
        Command::Precipitation { since } => {
            let since = match since {
                Some(since) => since,
                None => service.one_year_window_start().await?,
            };
            serde_json::to_value(service.precipitation_since(since).await?)?
        }
        Command::Stations => serde_json::to_value(service.distinct_station_names().await?)?,
        Command::Activity => serde_json::to_value(service.station_activity().await?)?,
        Command::Tobs { since } => {
            let since = match since {
                Some(since) => since,
                None => service.one_year_window_start().await?,
            };
            serde_json::to_value(
                service
                    .temperature_observations_for_most_active_station_since(since)
                    .await?,
            )?
        }
        Command::Temps { start, end } => {
            let today = Local::now().date_naive();
            let (start, end, stats) = service
                .temperature_stats_for_input(&start, end.as_deref(), today)
                .await?;
            json!({ "start": start, "end": end, "stats": stats })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
