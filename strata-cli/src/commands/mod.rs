//! Command implementations, one module per subcommand.

pub mod apply;
pub mod export;
pub mod plan;
pub mod rollback;
pub mod show;
pub mod status;

use strata_migrate::{MigrationConfig, MigrationEngine};
use strata_postgres::PgAdapter;

use crate::config;
use crate::error::CliResult;

/// Connect to the configured database and build an engine around it.
pub(crate) async fn engine(config: MigrationConfig) -> CliResult<MigrationEngine<PgAdapter>> {
    let adapter = PgAdapter::connect(&config::connect_params()).await?;
    Ok(MigrationEngine::new(config, adapter))
}
