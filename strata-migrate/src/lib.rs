//! # strata-migrate
//!
//! Migration engine for Strata: schema diffing, down-SQL synthesis,
//! versioned bundles, and applied-migration tracking.
//!
//! The engine compares the desired schema (a declarative document) with the
//! live database state and produces an ordered DDL plan, materialized as a
//! versioned bundle with a best-effort reverse script:
//!
//! ```text
//! ┌────────────────┐     ┌─────────────┐     ┌────────────────┐
//! │ Desired schema │────▶│ Diff engine │────▶│ Forward actions│
//! └────────────────┘     └─────────────┘     └────────────────┘
//!         ▲                     ▲                     │
//! ┌───────┴────────┐     ┌──────┴──────┐       ┌──────▼───────┐
//! │ Document (YAML)│     │ Introspector│──────▶│ Down synth   │
//! └────────────────┘     └─────────────┘ snap  └──────┬───────┘
//!                                                     ▼
//!                        ┌─────────────┐     ┌────────────────┐
//!                        │   Ledger    │◀────│ Bundle on disk │
//!                        └─────────────┘apply└────────────────┘
//! ```
//!
//! Bundles live in a migrations directory, one per plan:
//!
//! ```text
//! migrations/
//! ├── 20240101_120000_create_users/
//! │   ├── up.sql
//! │   ├── down.sql
//! │   └── plan.yaml
//! └── 20240102_093000_add_posts/
//!     ├── up.sql
//!     ├── down.sql
//!     └── plan.yaml
//! ```
//!
//! Applying a bundle verifies its checksum, then runs the forward SQL and
//! the ledger insert in a single transaction; rolling back runs the reverse
//! SQL and the ledger delete the same way. `status` correlates the two
//! sides and flags drift (an applied bundle whose forward SQL was edited
//! after the fact).

pub mod action;
pub mod bundle;
pub mod diff;
pub mod engine;
pub mod error;
pub mod introspect;
pub mod ledger;
pub mod reverse;

// Re-exports
pub use action::Action;
pub use bundle::{compute_checksum, Bundle, BundleStore};
pub use diff::{compare, Migrator, NamespacePair};
pub use engine::{
    ApplyReport, BundleStatus, MigrationConfig, MigrationEngine, MigrationPlan, SqlExecutor,
};
pub use error::{MigrateResult, MigrationError};
pub use introspect::Introspector;
pub use ledger::{record_sql, remove_sql, AppliedMigration, Ledger, LEDGER_INIT_SQL, LEDGER_TABLE};
pub use reverse::{reverse_actions, reverse_sql, ExistingState};
