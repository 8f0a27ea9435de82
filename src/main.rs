use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use climate_query_service::app::Application;
use climate_query_service::config::Config;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,climate_query_service=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    info!("Starting climate query service with config: {:?}", config);

    let application = Application::build(config).await?;
    application.run_until_stopped().await
}
