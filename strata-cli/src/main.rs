//! Strata - declarative schema migrations for PostgreSQL.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use strata_cli::cli::{Cli, Command};
use strata_cli::commands;
use strata_cli::error::CliResult;
use strata_cli::output;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Plan(args) => commands::plan::run(args).await,
        Command::Apply(args) => commands::apply::run(args).await,
        Command::Rollback(args) => commands::rollback::run(args).await,
        Command::Status(args) => commands::status::run(args).await,
        Command::Show => commands::show::run().await,
        Command::Export(args) => commands::export::run(args).await,
    }
}
