//! `strata apply` - apply pending migration bundles.

use strata_migrate::MigrationConfig;

use crate::cli::ApplyArgs;
use crate::error::CliResult;
use crate::output;

pub async fn run(args: ApplyArgs) -> CliResult<()> {
    let config = MigrationConfig::new()
        .migrations_dir(&args.migrations_dir)
        .dry_run(args.dry_run);
    let engine = super::engine(config).await?;

    let report = engine.apply().await?;
    if report.applied.is_empty() {
        output::info("Nothing to apply.");
        return Ok(());
    }

    for version in &report.applied {
        if report.dry_run {
            output::list_item(&format!("would apply {version}"));
        } else {
            output::list_item(&format!("applied {version}"));
        }
    }

    if report.dry_run {
        output::info(&format!("{} migration(s) pending (dry run)", report.applied.len()));
    } else {
        output::success(&format!("Applied {} migration(s).", report.applied.len()));
    }
    Ok(())
}
