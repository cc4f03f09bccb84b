//! The schema introspection contract.
//!
//! The diff engine never talks to a database directly; it consumes a fully
//! populated [`Database`] tree produced by an [`Introspector`]. Keeping the
//! contract this narrow keeps the engine engine-agnostic.
//!
//! Implementations are obliged to:
//!
//! - exclude internal/system namespaces (`pg_*`, `information_schema`);
//! - normalize type names to uppercase;
//! - strip the trailing `::<type>` cast suffix from default expressions;
//! - map server constraint-type codes (`p`/`u`/`f`/`c`) and referential
//!   action codes (`a`/`c`/`r`/`n`/`d`) onto the model enums;
//! - parse index definitions of the form
//!   `CREATE[ UNIQUE] INDEX <name> ON <ns>.<tbl> USING <algo> (<cols>)`.

use strata_schema::Database;

use crate::error::MigrateResult;

/// Reads the live schema into a schema model instance.
#[async_trait::async_trait]
pub trait Introspector: Send + Sync {
    /// Load the full database tree.
    async fn introspect(&self) -> MigrateResult<Database>;
}
