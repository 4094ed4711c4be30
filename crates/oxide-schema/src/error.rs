//! Error types for the MySQL driver and definition files.

use std::time::Duration;

use oxide_schema_core::SchemaError;

/// Errors raised outside the core rendering and reconciliation logic.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Database error reported by sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The database did not accept the connection in time.
    #[error("Timed out after {0:?} connecting to the database")]
    ConnectTimeout(Duration),

    /// IO error (reading definition files, starting the runtime).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The definition file is not valid JSON for the expected layout.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error from the schema layer.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A column definition cannot be turned into a column specification.
    #[error("Invalid definition for column '{column}': {reason}")]
    InvalidDefinition {
        /// Column name.
        column: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;
