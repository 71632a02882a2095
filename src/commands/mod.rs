//! Subcommand implementations

pub mod affected;
pub mod check;
pub mod graph;
pub mod project_root;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::Result;
use weft::config::{Config, ConfigWarning};
use weft::{BuildReport, DependencyGraph};

/// Where the command runs: project root plus the loaded configuration
pub struct Project {
    pub root: PathBuf,
    pub cwd: PathBuf,
    pub config: Config,
    pub config_warnings: Vec<ConfigWarning>,
}

impl Project {
    /// Project from the current directory
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let root = project_root::discover_project_root(&cwd);
        let (config, config_warnings) = Config::load_or_default(Some(&root));
        Ok(Self {
            root,
            cwd,
            config,
            config_warnings,
        })
    }

    /// `--root` if given (relative to the working directory), otherwise
    /// `[source] dir` relative to the project root
    pub fn document_root(&self, flag: Option<&Path>) -> PathBuf {
        match flag {
            Some(dir) => self.cwd.join(dir),
            None => self.config.document_root(&self.root),
        }
    }

    /// Resolve a user-supplied path against the working directory
    pub fn absolute(&self, path: &Path) -> PathBuf {
        self.cwd.join(path)
    }

    /// Build the full graph over a document root
    pub fn build_graph(&self, document_root: &Path) -> Result<(DependencyGraph, BuildReport)> {
        let mut graph = DependencyGraph::from_config(document_root, &self.config)?;
        let report = graph.build()?;
        Ok((graph, report))
    }
}
