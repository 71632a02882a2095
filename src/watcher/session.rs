//! One change event, processed to completion

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::compiler::Compiler;
use crate::graph::{DependencyGraph, GraphWarning};
use crate::parser::{FrontmatterExtractor, ImportExtractor};
use crate::resolver::{ImportCache, RepoImportCache};

use super::event::ChangeKind;

/// Everything that happened while handling one change
#[derive(Debug, Clone, Default)]
pub struct ChangeOutcome {
    /// Top-level documents the impact query selected
    pub affected: BTreeSet<PathBuf>,
    /// Handed to the compiler successfully
    pub compiled: Vec<PathBuf>,
    /// Affected but gone from disk (a deleted entry point)
    pub skipped: Vec<PathBuf>,
    /// Compiler failures, per document
    pub failures: Vec<(PathBuf, String)>,
    /// Recoverable graph warnings raised by the mutation
    pub warnings: Vec<GraphWarning>,
}

/// A live graph plus the compiler it feeds.
///
/// Each change is mutate → impact query → compile, finished before the
/// next change is looked at.
pub struct WatchSession<C, E = FrontmatterExtractor, R = RepoImportCache> {
    graph: DependencyGraph<E, R>,
    compiler: C,
}

impl<C: Compiler, E: ImportExtractor, R: ImportCache> WatchSession<C, E, R> {
    /// Wrap an already built graph
    pub fn new(graph: DependencyGraph<E, R>, compiler: C) -> Self {
        Self { graph, compiler }
    }

    pub fn graph(&self) -> &DependencyGraph<E, R> {
        &self.graph
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// Apply one change and compile whatever it affects
    pub fn handle_change(&mut self, path: &Path, kind: ChangeKind) -> ChangeOutcome {
        let mut outcome = ChangeOutcome {
            warnings: match kind {
                ChangeKind::Created | ChangeKind::Modified => self.graph.update(path),
                ChangeKind::Deleted => {
                    self.graph.remove(path);
                    Vec::new()
                }
            },
            ..ChangeOutcome::default()
        };

        outcome.affected = self.graph.affected_workflows(path);
        debug!(
            path = %path.display(),
            ?kind,
            affected = outcome.affected.len(),
            "change planned"
        );

        for target in &outcome.affected {
            if !target.exists() {
                outcome.skipped.push(target.clone());
                continue;
            }
            match self.compiler.compile(target) {
                Ok(()) => outcome.compiled.push(target.clone()),
                Err(e) => {
                    warn!(path = %target.display(), error = %e, "compile failed");
                    outcome.failures.push((target.clone(), e.to_string()));
                }
            }
        }

        outcome
    }
}
