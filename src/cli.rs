use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Weft - incremental dependency tracking for workflow documents
#[derive(Parser, Debug)]
#[command(name = "weft")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI (NDJSON on stdout)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the top-level workflows affected by changes to the given files
    Affected {
        /// Changed documents (relative paths are taken from the current directory)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Document root (defaults to [source] dir in weft.toml)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Print the dependency graph
    Graph {
        /// Document root (defaults to [source] dir in weft.toml)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Build the graph and report unreadable documents and unresolved imports
    Check {
        /// Document root (defaults to [source] dir in weft.toml)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Fail on warnings too (CI mode)
        #[arg(long)]
        strict: bool,
    },

    /// Watch the document root and recompile affected workflows on change
    Watch {
        /// Document root (defaults to [source] dir in weft.toml)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Only report what would be rebuilt
        #[arg(long)]
        no_compile: bool,
    },
}
