//! Transactional execution and ledger storage.

use strata_migrate::{
    AppliedMigration, Ledger, MigrateResult, MigrationError, SqlExecutor, LEDGER_INIT_SQL,
    LEDGER_TABLE,
};
use tracing::{debug, info};

use crate::connection::PgAdapter;

#[async_trait::async_trait]
impl SqlExecutor for PgAdapter {
    /// Execute the statements in one transaction.
    ///
    /// Any statement failure aborts the transaction; dropping it without
    /// commit rolls everything back on the server.
    async fn execute_transaction(&self, statements: &[String]) -> MigrateResult<()> {
        let mut client = self.client.lock().await;
        let transaction = client
            .transaction()
            .await
            .map_err(|e| MigrationError::execution(format!("could not start transaction: {e}")))?;

        for statement in statements {
            transaction
                .batch_execute(statement)
                .await
                .map_err(|e| MigrationError::execution(format!("`{statement}`: {e}")))?;
            info!(statement = %statement, "executed");
        }

        transaction
            .commit()
            .await
            .map_err(|e| MigrationError::execution(format!("could not commit transaction: {e}")))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Ledger for PgAdapter {
    async fn ensure(&self) -> MigrateResult<()> {
        debug!(table = LEDGER_TABLE, "ensuring ledger table");
        let client = self.client.lock().await;
        client
            .batch_execute(LEDGER_INIT_SQL)
            .await
            .map_err(|e| MigrationError::execution(format!("could not create ledger: {e}")))
    }

    async fn applied(&self) -> MigrateResult<Vec<AppliedMigration>> {
        let client = self.client.lock().await;
        let rows = client
            .query(
                "SELECT version, description, checksum, applied_at
                 FROM _strata_migrations
                 ORDER BY version",
                &[],
            )
            .await
            .map_err(|e| MigrationError::execution(format!("could not read ledger: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| AppliedMigration {
                version: row.get(0),
                description: row.get(1),
                checksum: row.get(2),
                applied_at: row.get(3),
            })
            .collect())
    }
}
