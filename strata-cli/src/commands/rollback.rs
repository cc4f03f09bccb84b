//! `strata rollback` - roll back the last N applied migrations.

use strata_migrate::MigrationConfig;

use crate::cli::RollbackArgs;
use crate::error::CliResult;
use crate::output;

pub async fn run(args: RollbackArgs) -> CliResult<()> {
    let engine = super::engine(MigrationConfig::new().migrations_dir(&args.migrations_dir)).await?;

    let rolled_back = engine.rollback(args.steps).await?;
    if rolled_back.is_empty() {
        output::info("No applied migrations to roll back.");
        return Ok(());
    }

    for version in &rolled_back {
        output::list_item(&format!("rolled back {version}"));
    }
    output::success(&format!("Rolled back {} migration(s).", rolled_back.len()));
    Ok(())
}
