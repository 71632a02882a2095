//! Weft CLI - incremental dependency tracking for workflow documents
//!
//! Usage: weft <COMMAND>
//!
//! Commands:
//!   affected  List top-level workflows affected by changed files
//!   graph     Print the dependency graph
//!   check     Report unreadable documents and unresolved imports
//!   watch     Recompile affected workflows on change

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weft::Verbosity;

use cli::{Cli, Commands};
use commands::Project;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let project = Project::discover()?;

    init_tracing(project.config.output.verbosity.raised_by(cli.verbose));
    for warning in &project.config_warnings {
        warn!("{}", warning);
    }

    match cli.command {
        Commands::Affected { paths, root } => {
            commands::affected::cmd_affected(&project, &paths, root, cli.json)
        }
        Commands::Graph { root } => commands::graph::cmd_graph(&project, root, cli.json),
        Commands::Check { root, strict } => {
            commands::check::cmd_check(&project, root, strict, cli.json)
        }
        Commands::Watch { root, no_compile } => {
            commands::watch::cmd_watch(&project, root, no_compile, cli.json)
        }
    }
}

/// Logs go to stderr so stdout stays clean for NDJSON; `RUST_LOG` wins
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
