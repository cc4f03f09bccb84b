//! Migration engine orchestration.
//!
//! Ties the pieces together: plan (validate, introspect, diff, synthesize
//! down-SQL), bundle writing, transactional apply of pending bundles,
//! rollback of the last N applied, and status correlation between the
//! migrations directory and the server-side ledger.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use strata_schema::{validate_namespaces, Namespace};
use tracing::{info, warn};

use crate::action::Action;
use crate::bundle::{Bundle, BundleStore};
use crate::diff::{compare, Migrator};
use crate::error::{MigrateResult, MigrationError};
use crate::introspect::Introspector;
use crate::ledger::{record_sql, remove_sql, AppliedMigration, Ledger};
use crate::reverse::{reverse_actions, reverse_sql, ExistingState};

/// Executes SQL against the target database.
///
/// Each call is one transaction: begin, execute every statement in order,
/// roll back on the first failure, commit on full success. No partial state
/// ever persists.
#[async_trait::async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute_transaction(&self, statements: &[String]) -> MigrateResult<()>;
}

/// Configuration for the migration engine.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Directory holding migration bundles.
    pub migrations_dir: PathBuf,
    /// Plan and report without executing anything.
    pub dry_run: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            migrations_dir: PathBuf::from("./migrations"),
            dry_run: false,
        }
    }
}

impl MigrationConfig {
    /// Create a new configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the migrations directory.
    pub fn migrations_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.migrations_dir = dir.into();
        self
    }

    /// Enable dry-run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// The output of `plan`: per-namespace migrators plus the rendered forward
/// and reverse scripts.
#[derive(Debug)]
pub struct MigrationPlan {
    /// One migrator per namespace pair, in emission order.
    pub migrators: Vec<Migrator>,
    /// Rendered forward statements.
    pub up: Vec<String>,
    /// Rendered reverse statements (including warning comments).
    pub down: Vec<String>,
}

impl MigrationPlan {
    /// Whether the plan contains no work.
    pub fn is_empty(&self) -> bool {
        self.migrators.iter().all(Migrator::is_empty)
    }

    /// Whether any migrator in the plan is structurally destructive.
    pub fn is_locked(&self) -> bool {
        self.migrators.iter().any(Migrator::is_locked)
    }
}

/// Result of an `apply` run.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Versions applied, in order. In dry-run mode: versions that would be.
    pub applied: Vec<String>,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

/// One row of `status` output.
#[derive(Debug)]
pub struct BundleStatus {
    /// The on-disk bundle.
    pub bundle: Bundle,
    /// Whether the ledger records this version.
    pub applied: bool,
    /// Applied, but the ledger checksum no longer matches the bundle.
    pub drift: bool,
}

impl BundleStatus {
    /// Short state label for display.
    pub fn state(&self) -> &'static str {
        if self.drift {
            "DRIFT"
        } else if self.applied {
            "applied"
        } else {
            "pending"
        }
    }
}

/// The migration engine.
///
/// Generic over the database adapter; any type providing introspection,
/// ledger access, and transactional execution will do, which is what keeps
/// the engine testable without a server.
pub struct MigrationEngine<A> {
    adapter: A,
    config: MigrationConfig,
    store: BundleStore,
}

impl<A> MigrationEngine<A> {
    /// Create an engine over an adapter.
    pub fn new(config: MigrationConfig, adapter: A) -> Self {
        let store = BundleStore::new(&config.migrations_dir);
        Self {
            adapter,
            config,
            store,
        }
    }

    /// The underlying adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }
}

impl<A: Introspector> MigrationEngine<A> {
    /// Plan the migration from the live state to the desired namespaces.
    ///
    /// Validates the desired schema, introspects the database, diffs, and
    /// synthesizes the reverse script from the pre-change snapshot. Locked
    /// plans are generated like any other; gating is the caller's concern.
    pub async fn plan(&self, desired: &[Namespace]) -> MigrateResult<MigrationPlan> {
        validate_namespaces(desired).map_err(strata_schema::SchemaError::from)?;

        let database = self.adapter.introspect().await?;
        let snapshot = ExistingState::from_namespaces(&database.namespaces);
        let migrators = compare(&database.namespaces, desired);

        let actions: Vec<Action> = migrators
            .iter()
            .flat_map(|m| m.actions().iter().cloned())
            .collect();
        let up: Vec<String> = actions.iter().map(ToString::to_string).collect();
        let down = reverse_actions(&actions, &snapshot);

        info!(
            namespaces = migrators.len(),
            actions = up.len(),
            "planned migration"
        );
        Ok(MigrationPlan {
            migrators,
            up,
            down,
        })
    }

    /// Export the live state as declared namespaces.
    pub async fn export(&self) -> MigrateResult<Vec<Namespace>> {
        Ok(self.adapter.introspect().await?.namespaces)
    }
}

impl<A> MigrationEngine<A> {
    /// Materialize a plan as an on-disk bundle.
    pub async fn write_bundle(
        &self,
        plan: &MigrationPlan,
        description: &str,
    ) -> MigrateResult<Bundle> {
        if plan.is_empty() {
            return Err(MigrationError::NoChanges);
        }
        let bundle = Bundle::new(description, plan.up.join("\n"), plan.down.join("\n"));
        let dir = self.store.write(&bundle).await?;
        info!(dir = %dir.display(), "wrote bundle");
        Ok(bundle)
    }
}

impl<A: Ledger + SqlExecutor> MigrationEngine<A> {
    /// Bundles on disk that the ledger has not recorded, in disk order.
    pub async fn pending(&self) -> MigrateResult<Vec<Bundle>> {
        self.adapter.ensure().await?;
        let applied: HashSet<String> = self
            .adapter
            .applied()
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        let bundles = self.store.load_all().await?;
        Ok(bundles
            .into_iter()
            .filter(|b| !applied.contains(&b.version))
            .collect())
    }

    /// Apply all pending bundles, stopping on the first failure.
    ///
    /// Each bundle's checksum is verified before anything executes; the
    /// forward statements and the ledger insert run in one transaction.
    pub async fn apply(&self) -> MigrateResult<ApplyReport> {
        let mut report = ApplyReport {
            dry_run: self.config.dry_run,
            ..Default::default()
        };

        for bundle in self.pending().await? {
            if !bundle.verify_checksum() {
                return Err(MigrationError::ChecksumMismatch {
                    version: bundle.version.clone(),
                    expected: bundle.checksum.clone(),
                    actual: crate::bundle::compute_checksum(&bundle.up_sql),
                });
            }

            if self.config.dry_run {
                info!(version = %bundle.version, "would apply (dry run)");
                report.applied.push(bundle.version);
                continue;
            }

            let mut statements = bundle.up_statements();
            statements.push(record_sql(&bundle));
            self.adapter.execute_transaction(&statements).await?;

            info!(version = %bundle.version, "applied migration");
            report.applied.push(bundle.version);
        }

        Ok(report)
    }

    /// Roll back the last `steps` applied migrations, newest first.
    ///
    /// Reverse statements and the ledger delete run in one transaction per
    /// bundle. A bundle that carries no reverse script (hand-written
    /// forward SQL) gets one synthesized from its `up.sql` by the
    /// pattern-matching synthesizer. Warning comments in the reverse
    /// script are skipped, loudly.
    pub async fn rollback(&self, steps: usize) -> MigrateResult<Vec<String>> {
        self.adapter.ensure().await?;
        let applied = self.adapter.applied().await?;

        let bundles: HashMap<String, Bundle> = self
            .store
            .load_all()
            .await?
            .into_iter()
            .map(|b| (b.version.clone(), b))
            .collect();

        let mut rolled_back = Vec::new();
        for record in applied.iter().rev().take(steps) {
            let bundle = bundles
                .get(&record.version)
                .ok_or_else(|| MigrationError::NotFound(record.version.clone()))?;

            let (statements, skipped) = reverse_statements(bundle);
            if skipped > 0 {
                warn!(
                    version = %bundle.version,
                    skipped,
                    "reverse script contains irreversible actions; skipping comment lines"
                );
            }

            if self.config.dry_run {
                info!(version = %bundle.version, "would roll back (dry run)");
                rolled_back.push(bundle.version.clone());
                continue;
            }

            let mut statements = statements;
            statements.push(remove_sql(&record.version));
            self.adapter.execute_transaction(&statements).await?;

            info!(version = %bundle.version, "rolled back migration");
            rolled_back.push(bundle.version.clone());
        }

        Ok(rolled_back)
    }

    /// Correlate on-disk bundles against the ledger.
    pub async fn status(&self) -> MigrateResult<Vec<BundleStatus>> {
        self.adapter.ensure().await?;
        let applied: HashMap<String, AppliedMigration> = self
            .adapter
            .applied()
            .await?
            .into_iter()
            .map(|m| (m.version.clone(), m))
            .collect();

        let mut statuses = Vec::new();
        for bundle in self.store.load_all().await? {
            let record = applied.get(&bundle.version);
            statuses.push(BundleStatus {
                applied: record.is_some(),
                drift: record.is_some_and(|r| r.checksum != bundle.checksum),
                bundle,
            });
        }
        Ok(statuses)
    }
}

/// The runnable reverse statements for a bundle, plus the number of warning
/// comment lines dropped on the way.
///
/// A bundle with no reverse script has one synthesized from its forward SQL;
/// reversals that would need the pre-change snapshot come out as warnings
/// and are counted with the rest.
fn reverse_statements(bundle: &Bundle) -> (Vec<String>, usize) {
    if bundle.down_sql.trim().is_empty() {
        let lines = reverse_sql(&bundle.up_sql, &ExistingState::new());
        let skipped = lines.iter().filter(|l| l.starts_with("--")).count();
        let statements = lines.into_iter().filter(|l| !l.starts_with("--")).collect();
        (statements, skipped)
    } else {
        let skipped = bundle
            .down_sql
            .lines()
            .map(str::trim)
            .filter(|l| l.starts_with("--"))
            .count();
        (bundle.down_statements(), skipped)
    }
}
