//! Error types for the PostgreSQL adapter.

use thiserror::Error;

/// Result type for adapter operations.
pub type PgResult<T> = Result<T, PgError>;

/// Errors raised by the PostgreSQL adapter.
///
/// At the engine contract boundary these are folded into the engine's
/// introspection/execution error kinds.
#[derive(Debug, Error)]
pub enum PgError {
    /// Could not establish or validate the connection.
    #[error("could not connect to database: {0}")]
    Connection(tokio_postgres::Error),

    /// A query against the server failed.
    #[error("query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// An index definition did not match the expected grammar.
    #[error("could not parse index definition `{0}`")]
    IndexDefinition(String),

    /// The server reported an unknown constraint type code.
    #[error("unknown constraint type code `{0}`")]
    ConstraintType(char),

    /// The server reported a sequence type the engine does not support.
    #[error("unsupported sequence type `{0}`")]
    SequenceType(String),
}
