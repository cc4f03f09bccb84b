//! `strata status` - correlate on-disk bundles against the ledger.

use strata_migrate::MigrationConfig;

use crate::cli::StatusArgs;
use crate::error::CliResult;
use crate::output;

pub async fn run(args: StatusArgs) -> CliResult<()> {
    let engine = super::engine(MigrationConfig::new().migrations_dir(&args.migrations_dir)).await?;

    let statuses = engine.status().await?;
    if statuses.is_empty() {
        output::info("No migrations found.");
        return Ok(());
    }

    println!("{:<30} {:<10} DESCRIPTION", "VERSION", "STATUS");
    println!("{}", "-".repeat(67));
    for status in &statuses {
        println!(
            "{:<30} {:<10} {}",
            status.bundle.version,
            status.state(),
            status.bundle.description
        );
    }

    let drifted = statuses.iter().filter(|s| s.drift).count();
    if drifted > 0 {
        output::newline();
        output::warn(&format!(
            "{drifted} applied bundle(s) changed on disk after apply; \
             inspect them before trusting rollback scripts."
        ));
    }
    Ok(())
}
