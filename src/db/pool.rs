use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{info, instrument};

use crate::db::DbError;

/// Open the measurement database read-only
///
/// The pool hands each request its own connection, so concurrent queries
/// never share a SQLite handle.
#[instrument]
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, DbError> {
    let connect_error = |source| DbError::Connect {
        url: database_url.to_string(),
        source,
    };

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(connect_error)?
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(connect_error)?;

    info!("Opened measurement database with up to {} connections", max_connections);
    Ok(pool)
}
