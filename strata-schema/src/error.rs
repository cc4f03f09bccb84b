//! Error types for schema loading and validation.

use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while loading or exporting schema documents.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The desired schema violates a model invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Error reading or writing a document file.
    #[error("failed to access `{path}`")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be parsed or serialized.
    #[error("malformed document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A violation of the schema model invariants.
///
/// Validation runs at document-load time, before any diffing, so every
/// variant names the offending entity rather than a source location.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("namespace has no name")]
    UnnamedNamespace,

    #[error("namespace name `{0}` is too long (max 63 characters)")]
    NamespaceNameTooLong(String),

    #[error("duplicate namespace `{0}`")]
    DuplicateNamespace(String),

    #[error("table in namespace `{namespace}` has no name")]
    UnnamedTable { namespace: String },

    #[error("table name `{0}` is too long (max 63 characters)")]
    TableNameTooLong(String),

    #[error("duplicate table `{namespace}.{table}`")]
    DuplicateTable { namespace: String, table: String },

    #[error("column on table `{table}` has no name")]
    UnnamedColumn { table: String },

    #[error("column `{table}.{column}` has no type")]
    UntypedColumn { table: String, column: String },

    #[error("column `{table}.{column}` is CHARACTER VARYING but has no positive max length")]
    MissingMaxLength { table: String, column: String },

    #[error("column `{table}.{column}` is of type {data_type} but declares a max length")]
    UnexpectedMaxLength {
        table: String,
        column: String,
        data_type: String,
    },

    #[error(
        "column `{table}.{column}` is not nullable and has neither a default nor the primary key flag"
    )]
    NotNullWithoutDefault { table: String, column: String },

    #[error("sequence in namespace `{namespace}` has no name")]
    UnnamedSequence { namespace: String },

    #[error("sequence name `{0}` is too long (max 63 characters)")]
    SequenceNameTooLong(String),

    #[error("duplicate sequence `{namespace}.{sequence}`")]
    DuplicateSequence { namespace: String, sequence: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_entity() {
        let err = ValidationError::NotNullWithoutDefault {
            table: "users".to_string(),
            column: "email".to_string(),
        };
        assert!(err.to_string().contains("users.email"));
    }

    #[test]
    fn schema_error_wraps_validation() {
        let err: SchemaError = ValidationError::UnnamedNamespace.into();
        assert!(err.to_string().contains("namespace has no name"));
    }
}
