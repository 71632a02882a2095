//! Candidate document discovery under a document root

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{debug, warn};

use crate::error::{WeftError, WeftResult};
use crate::paths::canonicalize_lossy;

use super::report::{GraphWarning, WarningKind};

/// Default document extensions
pub const DEFAULT_EXTENSIONS: &[&str] = &["md"];

/// Default exclude patterns (gitignore syntax)
pub const DEFAULT_EXCLUDE: &[&str] = &["README.md"];

/// Which files under the root count as documents
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    extensions: Vec<String>,
    exclude: Gitignore,
}

impl DiscoveryOptions {
    /// Build options; `exclude` patterns are matched relative to `root`
    pub fn new(root: &Path, extensions: &[String], exclude: &[String]) -> WeftResult<Self> {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in exclude {
            builder
                .add_line(None, pattern)
                .map_err(|e| WeftError::Config {
                    file: root.to_path_buf(),
                    message: format!("invalid exclude pattern '{}': {}", pattern, e),
                })?;
        }
        let exclude = builder.build().map_err(|e| WeftError::Config {
            file: root.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self {
            extensions: extensions.iter().map(|e| e.trim_start_matches('.').to_string()).collect(),
            exclude,
        })
    }

    /// Default options: `*.md`, excluding `README.md`
    pub fn defaults(root: &Path) -> Self {
        let extensions: Vec<String> = DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect();
        let exclude: Vec<String> = DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect();
        Self::new(root, &extensions, &exclude).unwrap_or_else(|_| Self {
            extensions,
            exclude: Gitignore::empty(),
        })
    }

    /// True if a file at `path` is a candidate document
    pub fn is_document(&self, path: &Path) -> bool {
        let extension_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|allowed| allowed == e))
            .unwrap_or(false);

        extension_ok && !self.exclude.matched(path, false).is_ignore()
    }

    /// True if discovery under `root` would have found `path`.
    ///
    /// Used to filter watcher events, which arrive for any file at any
    /// depth, including inside hidden or excluded directories.
    pub fn accepts(&self, root: &Path, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };
        let in_hidden_dir = relative
            .parent()
            .map(|dir| {
                dir.components()
                    .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
            })
            .unwrap_or(false);

        !in_hidden_dir
            && self.is_document(path)
            && !self
                .exclude
                .matched_path_or_any_parents(path, false)
                .is_ignore()
    }

    fn is_walkable_dir(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false);

        !hidden && !self.exclude.matched(path, true).is_ignore()
    }
}

/// Walk `root` (any depth) and return candidate documents, sorted.
///
/// Fails only if `root` itself cannot be listed; unreadable subdirectories
/// are recorded in `warnings` and skipped.
pub fn discover_documents(
    root: &Path,
    options: &DiscoveryOptions,
    warnings: &mut Vec<GraphWarning>,
) -> WeftResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(WeftError::Discovery {
            path: root.to_path_buf(),
            message: "not an existing directory".to_string(),
        });
    }

    let mut documents = Vec::new();
    let mut pending = VecDeque::from([root.to_path_buf()]);

    while let Some(dir) = pending.pop_front() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir == root => {
                return Err(WeftError::Discovery {
                    path: root.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                warnings.push(GraphWarning::new(&dir, WarningKind::Discovery, e.to_string()));
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

            if is_dir {
                if options.is_walkable_dir(&path) {
                    pending.push_back(path);
                }
            } else if path.is_file() && options.is_document(&path) {
                // Same key `update` and `remove` compute for a symlink
                documents.push(canonicalize_lossy(&path));
            }
        }
    }

    documents.sort();
    documents.dedup();
    debug!(root = %root.display(), count = documents.len(), "discovered documents");
    Ok(documents)
}
