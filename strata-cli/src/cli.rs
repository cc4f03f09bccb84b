//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Declarative schema migrations for PostgreSQL.
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(version)]
#[command(about = "Declarative schema migrations for PostgreSQL", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Diff the declared schema against the database and write a bundle
    Plan(PlanArgs),

    /// Apply pending migration bundles
    Apply(ApplyArgs),

    /// Roll back the last N applied migrations
    Rollback(RollbackArgs),

    /// Show pending/applied/drifted bundles
    Status(StatusArgs),

    /// Print the introspected database state
    Show,

    /// Export the introspected state as a schema document
    Export(ExportArgs),
}

/// Arguments for the `plan` command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the declared schema document
    #[arg(short, long, default_value = "./db.yaml")]
    pub file: PathBuf,

    /// Directory holding migration bundles
    #[arg(long, default_value = "./migrations")]
    pub migrations_dir: PathBuf,

    /// Description recorded in the bundle
    #[arg(short = 'm', long, default_value = "schema changes")]
    pub description: String,

    /// Write destructive plans without asking for confirmation
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `apply` command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Directory holding migration bundles
    #[arg(long, default_value = "./migrations")]
    pub migrations_dir: PathBuf,

    /// Report what would be applied without executing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `rollback` command
#[derive(Args, Debug)]
pub struct RollbackArgs {
    /// Directory holding migration bundles
    #[arg(long, default_value = "./migrations")]
    pub migrations_dir: PathBuf,

    /// Number of migrations to roll back
    #[arg(long, default_value_t = 1)]
    pub steps: usize,
}

/// Arguments for the `status` command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Directory holding migration bundles
    #[arg(long, default_value = "./migrations")]
    pub migrations_dir: PathBuf,
}

/// Arguments for the `export` command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to write the schema document to
    #[arg(short, long, default_value = "./db.yaml")]
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn plan_defaults() {
        let cli = Cli::try_parse_from(["strata", "plan"]).unwrap();
        match cli.command {
            Command::Plan(args) => {
                assert_eq!(args.file, PathBuf::from("./db.yaml"));
                assert_eq!(args.migrations_dir, PathBuf::from("./migrations"));
                assert!(!args.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rollback_steps_parse() {
        let cli = Cli::try_parse_from(["strata", "rollback", "--steps", "3"]).unwrap();
        match cli.command {
            Command::Rollback(args) => assert_eq!(args.steps, 3),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
