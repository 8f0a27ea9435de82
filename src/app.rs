use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::db::{pool, MeasurementStore, SqliteMeasurementStore};
use crate::services::ClimateService;

/// Running HTTP server over a measurement store
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
    pub local_addr: SocketAddr,
}

impl Application {
    /// Open the configured SQLite database and start serving it
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Connecting to measurement database {}", config.database_url);
        let pool = pool::connect(&config.database_url, config.db_max_connections).await?;
        let store = SqliteMeasurementStore::new(pool);

        Self::build_with_store(&config.server_addr(), Arc::new(store)).await
    }

    /// Start serving an already opened store on `addr`
    ///
    /// Binding happens before this returns, so `local_addr` is usable
    /// immediately, including when `addr` asks for port 0.
    pub async fn build_with_store(
        addr: &str,
        store: Arc<dyn MeasurementStore>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        let climate_service = ClimateService::new(store);
        let app_state = AppState { climate_service };
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Server listening on {}", local_addr);

        let server_handle = tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(Self {
            server_handle,
            local_addr,
        })
    }

    /// Run until the server stops (which runs indefinitely unless error)
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
