pub mod error;
pub mod memory_store;
pub mod models;
pub mod pool;
pub mod sqlite_store;
pub mod store;

pub use error::DbError;
pub use memory_store::InMemoryMeasurementStore;
pub use models::*;
pub use sqlite_store::SqliteMeasurementStore;
pub use store::{MeasurementFilter, MeasurementStore};
