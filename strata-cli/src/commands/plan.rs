//! `strata plan` - diff the declared schema against the database and write
//! a migration bundle.

use strata_migrate::MigrationConfig;
use strata_schema::Document;

use crate::cli::PlanArgs;
use crate::error::{CliError, CliResult};
use crate::output;

pub async fn run(args: PlanArgs) -> CliResult<()> {
    let document = Document::from_path(&args.file)?;

    let engine = super::engine(MigrationConfig::new().migrations_dir(&args.migrations_dir)).await?;
    let plan = engine.plan(&document.namespaces).await?;

    if plan.is_empty() {
        output::info("No differences found.");
        return Ok(());
    }

    for migrator in &plan.migrators {
        if migrator.is_empty() {
            continue;
        }
        output::section(&migrator.to_string());
        for action in migrator.actions() {
            output::list_item(&action.to_string());
        }
        output::newline();
    }

    if plan.is_locked() && !args.force {
        output::warn("This plan is destructive: it drops at least one schema.");
        if !output::confirm("Write the bundle anyway?")? {
            return Err(CliError::Aborted("plan aborted by operator".to_string()));
        }
    }

    let bundle = engine.write_bundle(&plan, &args.description).await?;
    output::success(&format!(
        "Wrote bundle {} ({} forward, {} reverse statements)",
        bundle.dir_name(),
        plan.up.len(),
        plan.down.len()
    ));
    Ok(())
}
