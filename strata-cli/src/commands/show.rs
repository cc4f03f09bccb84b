//! `strata show` - print the introspected database state.

use strata_migrate::MigrationConfig;
use strata_schema::Document;

use crate::error::CliResult;

pub async fn run() -> CliResult<()> {
    let engine = super::engine(MigrationConfig::new()).await?;
    let namespaces = engine.export().await?;
    print!("{}", Document::new(namespaces).to_yaml()?);
    Ok(())
}
