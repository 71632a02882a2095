//! Document dependency graph
//!
//! Tracks which documents import which, so a single file change can be
//! mapped to the minimal set of top-level documents (build entry points)
//! that must be recompiled.
//!
//! ## Structure
//!
//! - `nodes`: canonical path → [`DocumentNode`] (classification + imports)
//! - `reverse`: imported path → set of direct importers, always the
//!   inversion of every node's `imports`, maintained incrementally
//! - `unresolved`: documents with at least one import that did not resolve;
//!   re-read whenever a new document appears
//!
//! ## Lifecycle
//!
//! ```ignore
//! let mut graph = DependencyGraph::new(".github/workflows");
//! let report = graph.build()?;            // full scan, once
//! graph.update(Path::new("shared/x.md")); // per change event
//! let rebuild = graph.affected_workflows(Path::new("shared/x.md"));
//! ```

mod discovery;
mod report;
mod snapshot;


use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::WeftResult;
use crate::models::DocumentNode;
use crate::parser::{FrontmatterExtractor, ImportExtractor};
use crate::paths::{canonicalize_lossy, is_top_level};
use crate::resolver::{resolve_import, ImportCache, RepoImportCache, DEFAULT_REPO_MARKER};

pub use discovery::{discover_documents, DiscoveryOptions, DEFAULT_EXCLUDE, DEFAULT_EXTENSIONS};
pub use report::{BuildReport, GraphWarning, WarningKind};
pub use snapshot::{DocumentSnapshot, GraphSnapshot};

/// Dependency graph over the documents of one document root.
///
/// Generic over the two collaborators it reads through: the import
/// extractor (document → raw references) and the import cache (reference →
/// file, for anything not document-relative).
#[derive(Debug)]
pub struct DependencyGraph<E = FrontmatterExtractor, C = RepoImportCache> {
    root: PathBuf,
    discovery: DiscoveryOptions,
    extractor: E,
    cache: C,
    nodes: HashMap<PathBuf, DocumentNode>,
    reverse: HashMap<PathBuf, BTreeSet<PathBuf>>,
    unresolved: BTreeSet<PathBuf>,
}

impl DependencyGraph {
    /// Graph over `root` with the default extractor and an import cache
    /// rooted at the enclosing repository
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = canonicalize_lossy(root.as_ref());
        let cache = RepoImportCache::discover(&root, &[DEFAULT_REPO_MARKER.to_string()]);
        Self::with_collaborators(&root, FrontmatterExtractor::new(), cache)
    }

    /// Graph over `root` configured from `[source]` and `[resolve]`
    pub fn from_config(root: impl AsRef<Path>, config: &Config) -> WeftResult<Self> {
        let root = canonicalize_lossy(root.as_ref());
        let cache = RepoImportCache::discover(&root, &config.resolve.markers)
            .with_cache_dir(&config.resolve.cache_dir);
        let discovery =
            DiscoveryOptions::new(&root, &config.source.extensions, &config.source.exclude)?;

        Ok(Self::with_collaborators(&root, FrontmatterExtractor::new(), cache)
            .with_discovery(discovery))
    }
}

impl<E: ImportExtractor, C: ImportCache> DependencyGraph<E, C> {
    /// Graph over `root` reading through the given collaborators
    pub fn with_collaborators(root: impl AsRef<Path>, extractor: E, cache: C) -> Self {
        let root = canonicalize_lossy(root.as_ref());
        let discovery = DiscoveryOptions::defaults(&root);
        Self {
            root,
            discovery,
            extractor,
            cache,
            nodes: HashMap::new(),
            reverse: HashMap::new(),
            unresolved: BTreeSet::new(),
        }
    }

    /// Replace the discovery rules used by [`build`](Self::build)
    pub fn with_discovery(mut self, discovery: DiscoveryOptions) -> Self {
        self.discovery = discovery;
        self
    }

    /// The canonical document root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the document root and insert every document not yet present.
    ///
    /// Fails only when the root cannot be scanned. Per-document problems
    /// are returned in the report and logged.
    pub fn build(&mut self) -> WeftResult<BuildReport> {
        let mut report = BuildReport::default();
        let documents = discover_documents(&self.root, &self.discovery, &mut report.warnings)?;
        report.discovered = documents.len();

        for path in documents {
            if self.insert_document(path, &mut report.warnings) {
                report.inserted += 1;
            } else {
                report.skipped += 1;
            }
        }

        info!(
            root = %self.root.display(),
            documents = self.nodes.len(),
            inserted = report.inserted,
            warnings = report.warnings.len(),
            "dependency graph built"
        );
        Ok(report)
    }

    /// Re-derive one document's edges after it changed on disk.
    ///
    /// Old reverse edges are dropped before the document is re-inserted,
    /// so nothing stale survives however the import list changed. A
    /// document new to the graph may be what other documents were
    /// missing, so their edges are restored or re-derived.
    pub fn update(&mut self, path: &Path) -> Vec<GraphWarning> {
        let key = self.key(path);
        let mut warnings = Vec::new();

        let previous = self.detach(&key);
        if previous.is_none() {
            self.cache.invalidate();
        }

        self.insert_document(key.clone(), &mut warnings);

        if previous.is_none() {
            self.relink_importers(&key);
            self.retry_unresolved(&key);
        }

        debug!(path = %key.display(), warnings = warnings.len(), "document updated");
        warnings
    }

    /// Forget a document: its node, the edges it created, and its own
    /// reverse-index entry. Returns whether the document was known.
    pub fn remove(&mut self, path: &Path) -> bool {
        let key = self.key(path);

        let removed = self.detach(&key);
        self.reverse.remove(&key);
        self.cache.invalidate();

        debug!(path = %key.display(), known = removed.is_some(), "document removed");
        removed.is_some()
    }

    /// Top-level documents that must be rebuilt after `path` changed.
    ///
    /// - unknown path that documents import anyway (an excluded or
    ///   non-document file): its dependents, plus itself if top-level
    /// - unknown top-level path: just itself
    /// - unknown fragment: every known top-level document, since anything
    ///   may come to import it
    /// - known top-level document: just itself
    /// - known fragment: top-level documents reachable through the
    ///   reverse index
    pub fn affected_workflows(&self, path: &Path) -> BTreeSet<PathBuf> {
        let key = self.key(path);

        match self.nodes.get(&key) {
            None if self.reverse.contains_key(&key) => {
                let mut affected = self.dependent_workflows(&key);
                if is_top_level(&self.root, &key) {
                    affected.insert(key);
                }
                affected
            }
            None if is_top_level(&self.root, &key) => BTreeSet::from([key]),
            None => {
                debug!(path = %key.display(), "unknown fragment, rebuilding every workflow");
                self.top_level_documents()
            }
            Some(node) if node.is_top_level => BTreeSet::from([key]),
            Some(_) => self.dependent_workflows(&key),
        }
    }

    /// Breadth-first walk up the reverse index from a fragment
    fn dependent_workflows(&self, start: &Path) -> BTreeSet<PathBuf> {
        let mut affected = BTreeSet::new();
        let mut visited: BTreeSet<&Path> = BTreeSet::from([start]);
        let mut queue: VecDeque<&Path> = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            let Some(importers) = self.reverse.get(current) else {
                continue;
            };

            for importer in importers {
                if !visited.insert(importer.as_path()) {
                    continue;
                }
                if self.is_top_level_document(importer) {
                    affected.insert(importer.clone());
                } else {
                    queue.push_back(importer.as_path());
                }
            }
        }

        debug!(
            path = %start.display(),
            affected = affected.len(),
            visited = visited.len(),
            "resolved dependent workflows"
        );
        affected
    }

    /// Structural classification of any path against this root
    pub fn is_top_level(&self, path: &Path) -> bool {
        is_top_level(&self.root, &self.key(path))
    }

    /// True if `path` is a document [`build`](Self::build) would pick up
    pub fn is_candidate(&self, path: &Path) -> bool {
        self.discovery.accepts(&self.root, &self.key(path))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.nodes.contains_key(&self.key(path))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every known top-level document
    pub fn top_level_documents(&self) -> BTreeSet<PathBuf> {
        self.nodes
            .values()
            .filter(|node| node.is_top_level)
            .map(|node| node.path.clone())
            .collect()
    }

    /// Resolved imports of a known document, in declaration order
    pub fn imports_of(&self, path: &Path) -> Option<Vec<PathBuf>> {
        self.nodes.get(&self.key(path)).map(|node| node.imports.clone())
    }

    /// Documents that directly import `path`
    pub fn importers_of(&self, path: &Path) -> BTreeSet<PathBuf> {
        self.reverse
            .get(&self.key(path))
            .cloned()
            .unwrap_or_default()
    }

    /// True if `path` is a key of the reverse index
    pub fn has_importers_entry(&self, path: &Path) -> bool {
        self.reverse.contains_key(&self.key(path))
    }

    /// Owned, sorted copy of the whole graph
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::capture(&self.root, &self.nodes, &self.reverse)
    }

    /// Insert one document unless already present. Shared by `build` and
    /// `update`.
    fn insert_document(&mut self, path: PathBuf, warnings: &mut Vec<GraphWarning>) -> bool {
        if self.nodes.contains_key(&path) {
            debug!(path = %path.display(), "already in graph, skipping");
            return false;
        }

        let top_level = is_top_level(&self.root, &path);
        let (imports, complete) = self.resolve_imports(&path, warnings);
        if !complete {
            self.unresolved.insert(path.clone());
        }

        for import in &imports {
            self.reverse
                .entry(import.clone())
                .or_default()
                .insert(path.clone());
        }
        self.nodes
            .insert(path.clone(), DocumentNode::new(path, top_level, imports));
        true
    }

    /// Resolved imports, plus whether every reference resolved
    fn resolve_imports(
        &self,
        path: &Path,
        warnings: &mut Vec<GraphWarning>,
    ) -> (Vec<PathBuf>, bool) {
        let references = match self.extractor.extract_imports(path) {
            Ok(references) => references,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read imports, treating as leaf");
                warnings.push(GraphWarning::new(path, WarningKind::Extraction, e.to_string()));
                return (Vec::new(), true);
            }
        };

        let base_dir = path.parent().unwrap_or(&self.root);
        let mut imports = Vec::with_capacity(references.len());
        let mut complete = true;

        for import in references {
            match resolve_import(&import.reference, base_dir, &self.cache) {
                Ok(resolved) => imports.push(resolved),
                Err(_) if import.optional => {
                    debug!(path = %path.display(), reference = %import.reference, "optional import not found");
                    complete = false;
                }
                Err(e) => {
                    warn!(path = %path.display(), reference = %import.reference, "dropping unresolved import");
                    warnings.push(GraphWarning::new(path, WarningKind::Resolution, e.to_string()));
                    complete = false;
                }
            }
        }

        (imports, complete)
    }

    /// Take a node out of the graph along with the edges it created
    fn detach(&mut self, key: &Path) -> Option<DocumentNode> {
        let node = self.nodes.remove(key)?;
        self.unlink(&node);
        self.unresolved.remove(key);
        Some(node)
    }

    /// Re-derive every document that had a dangling import, now that
    /// `created` exists. Their warnings were already reported once.
    fn retry_unresolved(&mut self, created: &Path) {
        let pending: Vec<PathBuf> = self
            .unresolved
            .iter()
            .filter(|path| path.as_path() != created)
            .cloned()
            .collect();

        let mut repeated = Vec::new();
        for path in pending {
            if self.detach(&path).is_some() {
                self.insert_document(path, &mut repeated);
            }
        }
        debug!(
            path = %created.display(),
            still_unresolved = self.unresolved.len(),
            "retried dangling imports"
        );
    }

    /// Remove every reverse edge `node` created as an importer
    fn unlink(&mut self, node: &DocumentNode) {
        for import in &node.imports {
            if let Some(importers) = self.reverse.get_mut(import) {
                importers.remove(&node.path);
                if importers.is_empty() {
                    self.reverse.remove(import);
                }
            }
        }
    }

    /// A document came (back) into existence: importers that still list it
    /// get their reverse edges restored.
    fn relink_importers(&mut self, path: &Path) {
        let importers: Vec<PathBuf> = self
            .nodes
            .values()
            .filter(|node| node.path != path && node.imports.iter().any(|i| i == path))
            .map(|node| node.path.clone())
            .collect();

        if importers.is_empty() {
            return;
        }
        debug!(path = %path.display(), importers = importers.len(), "relinking importers");
        self.reverse
            .entry(path.to_path_buf())
            .or_default()
            .extend(importers);
    }

    fn is_top_level_document(&self, path: &Path) -> bool {
        self.nodes
            .get(path)
            .map(|node| node.is_top_level)
            .unwrap_or_else(|| is_top_level(&self.root, path))
    }

    /// Canonical graph key for a caller-supplied path. Relative paths are
    /// taken relative to the document root.
    fn key(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            canonicalize_lossy(path)
        } else {
            canonicalize_lossy(&self.root.join(path))
        }
    }
}
