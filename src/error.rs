use crate::db::DbError;
use crate::validation::InvalidDateFormat;

/// Failures surfaced by the climate query engine
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    InvalidDateFormat(#[from] InvalidDateFormat),

    #[error("Dataset contains no measurements")]
    EmptyDataset,

    #[error("Measurement store unavailable: {0}")]
    StoreUnavailable(#[from] DbError),
}
