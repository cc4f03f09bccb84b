//! CLI error types and result alias.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema document error.
    #[error(transparent)]
    Schema(#[from] strata_schema::SchemaError),

    /// Migration engine error.
    #[error(transparent)]
    Migration(#[from] strata_migrate::MigrationError),

    /// Database adapter error.
    #[error(transparent)]
    Database(#[from] strata_postgres::PgError),

    /// The operator declined a destructive plan.
    #[error("{0}")]
    Aborted(String),
}
