//! Error types for the migration engine.

use thiserror::Error;

/// Result type alias for migration operations.
pub type MigrateResult<T> = Result<T, MigrationError>;

/// Errors that can occur during migration operations.
///
/// Every kind propagates to the caller unchanged; the engine does not retry
/// and does not swallow. Transactional rollback inside the executor is the
/// only local recovery.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The desired schema failed to load or validate.
    #[error(transparent)]
    Schema(#[from] strata_schema::SchemaError),

    /// File system error while reading or writing bundles.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bundle directory is missing files or has an invalid name.
    #[error("invalid bundle: {0}")]
    InvalidBundle(String),

    /// Bundle metadata (plan.yaml) could not be parsed or serialized.
    #[error("malformed bundle metadata: {0}")]
    Metadata(#[from] serde_yaml::Error),

    /// The on-disk forward SQL no longer matches the recorded checksum.
    #[error(
        "migration '{version}' has been modified since it was planned: \
         expected checksum {expected}, found {actual}"
    )]
    ChecksumMismatch {
        version: String,
        expected: String,
        actual: String,
    },

    /// An applied migration has no bundle on disk.
    #[error("migration '{0}' not found on disk")]
    NotFound(String),

    /// Reading the live schema failed.
    #[error("introspection failed: {0}")]
    Introspection(String),

    /// A SQL statement failed; the surrounding transaction was rolled back.
    #[error("execution failed: {0}")]
    Execution(String),

    /// The diff produced no actions.
    #[error("no schema changes detected")]
    NoChanges,
}

impl MigrationError {
    /// Create an introspection error.
    pub fn introspection(msg: impl Into<String>) -> Self {
        Self::Introspection(msg.into())
    }

    /// Create an execution error.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create an invalid-bundle error.
    pub fn invalid_bundle(msg: impl Into<String>) -> Self {
        Self::InvalidBundle(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_mismatch_names_both_sums() {
        let err = MigrationError::ChecksumMismatch {
            version: "20240101_120000".to_string(),
            expected: "abc".to_string(),
            actual: "xyz".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("20240101_120000"));
        assert!(msg.contains("abc"));
        assert!(msg.contains("xyz"));
    }
}
