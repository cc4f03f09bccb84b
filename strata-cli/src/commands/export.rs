//! `strata export` - write the introspected state as a schema document.

use strata_migrate::MigrationConfig;
use strata_schema::Document;

use crate::cli::ExportArgs;
use crate::error::CliResult;
use crate::output;

pub async fn run(args: ExportArgs) -> CliResult<()> {
    let engine = super::engine(MigrationConfig::new()).await?;
    let namespaces = engine.export().await?;

    Document::new(namespaces).write(&args.file)?;
    output::success(&format!("Exported state to {}", args.file.display()));
    Ok(())
}
