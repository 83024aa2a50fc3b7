//! Label store implementations backed by external storage

mod postgres;

pub use postgres::{PostgresConfig, PostgresLabelStore};
