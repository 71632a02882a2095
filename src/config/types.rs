//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WeftResult;
use crate::graph::{DEFAULT_EXCLUDE, DEFAULT_EXTENSIONS};
use crate::resolver::{DEFAULT_CACHE_DIR, DEFAULT_REPO_MARKER};

use super::loader::{self, ConfigWarning};

/// Where documents live and which files count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Document root, relative to the project root
    #[serde(default = "default_source_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Gitignore-style patterns, relative to the document root
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: default_source_dir(),
            extensions: default_extensions(),
            exclude: default_exclude(),
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from(".github/workflows")
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_exclude() -> Vec<String> {
    DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect()
}

/// Import resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Files or directories marking the repository root
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,

    /// Vendored remote imports, relative to the repository root
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            markers: default_markers(),
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_markers() -> Vec<String> {
    vec![DEFAULT_REPO_MARKER.to_string()]
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR)
}

/// Watch loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    crate::watcher::DEBOUNCE_MS
}

/// External compiler invoked once per affected document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileConfig {
    #[serde(default = "default_compile_command")]
    pub command: String,

    #[serde(default = "default_compile_args")]
    pub args: Vec<String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            command: default_compile_command(),
            args: default_compile_args(),
        }
    }
}

fn default_compile_command() -> String {
    "gh".to_string()
}

fn default_compile_args() -> Vec<String> {
    vec!["aw".to_string(), "compile".to_string()]
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    /// Raise the configured level by the number of `-v` flags
    pub fn raised_by(self, count: u8) -> Self {
        let levels = [
            Verbosity::Quiet,
            Verbosity::Normal,
            Verbosity::Verbose,
            Verbosity::Debug,
        ];
        let current = levels.iter().position(|l| *l == self).unwrap_or(1);
        levels[(current + count as usize).min(levels.len() - 1)]
    }

    /// `tracing` filter directive for this crate
    pub fn filter_directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "weft=error",
            Verbosity::Normal => "weft=warn",
            Verbosity::Verbose => "weft=info",
            Verbosity::Debug => "weft=debug",
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub compile: CompileConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> WeftResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> WeftResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from project config, user config, or defaults (plus env overrides)
    pub fn load_or_default(project_root: Option<&Path>) -> (Self, Vec<ConfigWarning>) {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (WEFT_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Absolute document root for a project
    pub fn document_root(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.source.dir)
    }
}
