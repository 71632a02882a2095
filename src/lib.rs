//! Weft - incremental dependency tracking for workflow documents
//!
//! Weft keeps a graph of which workflow documents import which shared
//! fragments, so that a single file change maps to the minimal set of
//! top-level workflows that must be recompiled. The graph is built once and
//! then maintained per change, which is what the `watch` command runs on.

pub mod compiler;
pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod parser;
pub mod paths;
pub mod resolver;
pub mod watcher;

// Re-exports for convenience
pub use compiler::{CommandCompiler, Compiler, NoopCompiler};
pub use config::{Config, Verbosity};
pub use error::{WeftError, WeftResult};
pub use graph::{BuildReport, DependencyGraph, GraphSnapshot, GraphWarning, WarningKind};
pub use models::{DocumentNode, Frontmatter, ImportRef};
pub use parser::{parse_frontmatter, FrontmatterExtractor, ImportExtractor};
pub use resolver::{resolve_import, ImportCache, RepoImportCache};
pub use watcher::{watch, ChangeKind, ChangeOutcome, WatchEvent, WatchOptions, WatchSession};
