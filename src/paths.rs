//! Path helpers shared by the graph, resolver and watcher
//!
//! Graph keys are canonical absolute paths. Watch events for deleted files
//! cannot be canonicalized directly, so [`canonicalize_lossy`] falls back to
//! canonicalizing the parent and re-attaching the file name.

use std::path::{Component, Path, PathBuf};

/// Canonicalize a path that may no longer exist.
///
/// Tries, in order: the full path, its parent + file name, and finally a
/// lexical normalization against the current directory.
pub fn canonicalize_lossy(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        if let Ok(parent) = parent.canonicalize() {
            return parent.join(name);
        }
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    normalize_lexically(&absolute)
}

/// Resolve `.` and `..` without touching the filesystem
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// True iff `path`, relative to `root`, has no directory component.
///
/// Purely structural: paths outside `root`, and `root` itself, are not
/// top-level.
pub fn is_top_level(root: &Path, path: &Path) -> bool {
    match path.strip_prefix(root) {
        Ok(relative) => relative.components().count() == 1,
        Err(_) => false,
    }
}

/// Drop a `#Section` anchor from an import reference
pub fn strip_anchor(reference: &str) -> &str {
    match reference.split_once('#') {
        Some((file, _section)) => file,
        None => reference,
    }
}

/// Display `path` relative to `root` when possible
pub fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
