//! Ingestion error types

use thiserror::Error;

use core_kernel::PortError;
use infra_db::DatabaseError;

/// Errors raised while configuring or wiring the ingestion job
///
/// Per-file failures never surface here; they are logged, counted, and
/// recorded in the `IngestionReport`.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid filename pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Date capture group {date_index} does not exist in a pattern with {groups} groups")]
    InvalidDateIndex { date_index: usize, groups: usize },

    #[error("File source error: {0}")]
    Source(#[from] PortError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl IngestionError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        IngestionError::InvalidConfig(message.into())
    }
}
