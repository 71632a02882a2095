//! Import resolution
//!
//! Turns a textual import reference plus the importing document's directory
//! into a canonical absolute path:
//! 1. `#Section` anchors are stripped (rebuilds are per file)
//! 2. the reference is tried relative to the importing document
//! 3. otherwise it is delegated to an [`ImportCache`] rooted at the
//!    repository root
//!
//! A reference neither strategy can place is an error the graph downgrades
//! to a warning; it never becomes an edge.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{WeftError, WeftResult};
use crate::paths::{canonicalize_lossy, strip_anchor};

/// Default marker identifying a repository root
pub const DEFAULT_REPO_MARKER: &str = ".git";

/// Default location of vendored remote imports, relative to the repository root
pub const DEFAULT_CACHE_DIR: &str = ".github/aw/imports";

/// Maps import references that are not document-relative to files
pub trait ImportCache {
    fn resolve(&self, reference: &str, base_dir: &Path) -> WeftResult<PathBuf>;

    /// Forget memoized answers (files were created or deleted)
    fn invalidate(&self) {}
}

/// Resolve one import reference declared by a document living in `base_dir`
pub fn resolve_import(
    reference: &str,
    base_dir: &Path,
    cache: &impl ImportCache,
) -> WeftResult<PathBuf> {
    let file = strip_anchor(reference).trim();
    if file.is_empty() {
        return Err(WeftError::UnresolvedImport {
            reference: reference.to_string(),
            base_dir: base_dir.to_path_buf(),
        });
    }

    let relative = base_dir.join(file);
    if relative.is_file() {
        debug!(reference, resolved = %relative.display(), "resolved relative import");
        return Ok(canonicalize_lossy(&relative));
    }

    cache
        .resolve(file, base_dir)
        .map(|resolved| canonicalize_lossy(&resolved))
}

/// Walk up from `start` looking for any of `markers`.
///
/// Bounded by the filesystem root; returns `fallback` when nothing matches.
pub fn find_repository_root(start: &Path, markers: &[String], fallback: &Path) -> PathBuf {
    for dir in start.ancestors() {
        if markers.iter().any(|marker| dir.join(marker).exists()) {
            return dir.to_path_buf();
        }
    }
    fallback.to_path_buf()
}

/// Import cache scoped to a repository root.
///
/// Candidates, first existing file wins:
/// - absolute references as written
/// - `<repo>/<reference>` for repository-relative imports
/// - `<repo>/<cache_dir>/<reference>` for vendored remote imports, where
///   `owner/repo/path@ref` is stored as `owner/repo/path/ref`
///
/// Answers (including misses) are memoized per `(reference, base_dir)`.
#[derive(Debug)]
pub struct RepoImportCache {
    repo_root: PathBuf,
    cache_dir: PathBuf,
    memo: RefCell<HashMap<(String, PathBuf), Option<PathBuf>>>,
}

impl RepoImportCache {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        let repo_root = repo_root.into();
        let cache_dir = repo_root.join(DEFAULT_CACHE_DIR);
        Self {
            repo_root,
            cache_dir,
            memo: RefCell::new(HashMap::new()),
        }
    }

    /// Override the vendored-imports directory (relative to the repo root)
    pub fn with_cache_dir(mut self, cache_dir: impl AsRef<Path>) -> Self {
        self.cache_dir = self.repo_root.join(cache_dir);
        self
    }

    /// Cache rooted at the repository enclosing `document_root`
    pub fn discover(document_root: &Path, markers: &[String]) -> Self {
        Self::new(find_repository_root(document_root, markers, document_root))
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    fn candidates(&self, reference: &str) -> Vec<PathBuf> {
        let path = Path::new(reference);
        if path.is_absolute() {
            return vec![path.to_path_buf()];
        }

        let mut candidates = vec![
            self.repo_root.join(reference),
            self.cache_dir.join(reference),
        ];
        if reference.contains('@') {
            candidates.push(self.cache_dir.join(reference.replace('@', "/")));
        }
        candidates
    }

    fn lookup(&self, reference: &str) -> Option<PathBuf> {
        self.candidates(reference)
            .into_iter()
            .find(|candidate| candidate.is_file())
    }
}

impl ImportCache for RepoImportCache {
    fn resolve(&self, reference: &str, base_dir: &Path) -> WeftResult<PathBuf> {
        let key = (reference.to_string(), base_dir.to_path_buf());

        let cached = self.memo.borrow().get(&key).cloned();
        let answer = match cached {
            Some(answer) => answer,
            None => {
                let answer = self.lookup(reference);
                self.memo.borrow_mut().insert(key, answer.clone());
                answer
            }
        };

        answer.ok_or_else(|| WeftError::UnresolvedImport {
            reference: reference.to_string(),
            base_dir: base_dir.to_path_buf(),
        })
    }

    fn invalidate(&self) {
        self.memo.borrow_mut().clear();
    }
}
