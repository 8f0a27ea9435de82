/// Failures raised by a measurement store.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Failed to open measurement database {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),
}
