//! The applied-migration ledger.
//!
//! The server keeps a single registry table recording every applied bundle:
//! version, description, checksum at apply time, and timestamp. The ledger
//! is how `apply` knows what is pending, how re-applying a recorded version
//! becomes a no-op, and how `status` detects drift.
//!
//! The trait is read-only plus creation: ledger *writes* are rendered as
//! SQL by [`record_sql`] / [`remove_sql`] and appended to the migration's
//! own statement list, so the DDL and its ledger row commit or roll back
//! together in one transaction.

use chrono::{DateTime, Utc};

use crate::bundle::Bundle;
use crate::error::MigrateResult;

/// Name of the server-side registry table.
pub const LEDGER_TABLE: &str = "_strata_migrations";

/// Idempotent DDL creating the registry table.
pub const LEDGER_INIT_SQL: &str = "\
CREATE TABLE IF NOT EXISTS _strata_migrations (
    version VARCHAR(255) PRIMARY KEY,
    description TEXT NOT NULL DEFAULT '',
    checksum VARCHAR(64) NOT NULL,
    applied_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
);";

/// A record of an applied migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    /// Bundle version.
    pub version: String,
    /// Bundle description.
    pub description: String,
    /// Forward-SQL checksum at apply time.
    pub checksum: String,
    /// When the migration was applied.
    pub applied_at: DateTime<Utc>,
}

/// The applied-migration registry.
#[async_trait::async_trait]
pub trait Ledger: Send + Sync {
    /// Create the registry table if it does not exist.
    async fn ensure(&self) -> MigrateResult<()>;

    /// All applied migrations, ascending by version.
    async fn applied(&self) -> MigrateResult<Vec<AppliedMigration>>;
}

/// INSERT recording a bundle as applied.
pub fn record_sql(bundle: &Bundle) -> String {
    format!(
        "INSERT INTO {LEDGER_TABLE} (version, description, checksum) VALUES ({}, {}, {});",
        quote_literal(&bundle.version),
        quote_literal(&bundle.description),
        quote_literal(&bundle.checksum),
    )
}

/// DELETE removing a rolled-back version.
pub fn remove_sql(version: &str) -> String {
    format!(
        "DELETE FROM {LEDGER_TABLE} WHERE version = {};",
        quote_literal(version)
    )
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
