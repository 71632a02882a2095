//! Serializable view of a dependency graph (`weft graph`)

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::models::DocumentNode;
use crate::paths::display_relative;

/// One document with its edges in both directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSnapshot {
    pub path: PathBuf,
    pub top_level: bool,
    pub imports: Vec<PathBuf>,
    pub importers: Vec<PathBuf>,
}

/// Owned copy of a graph, sorted by path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    pub root: PathBuf,
    pub documents: Vec<DocumentSnapshot>,
}

impl GraphSnapshot {
    pub(crate) fn capture(
        root: &Path,
        nodes: &HashMap<PathBuf, DocumentNode>,
        reverse: &HashMap<PathBuf, BTreeSet<PathBuf>>,
    ) -> Self {
        let mut documents: Vec<DocumentSnapshot> = nodes
            .values()
            .map(|node| DocumentSnapshot {
                path: node.path.clone(),
                top_level: node.is_top_level,
                imports: node.imports.clone(),
                importers: reverse
                    .get(&node.path)
                    .map(|set| set.iter().cloned().collect())
                    .unwrap_or_default(),
            })
            .collect();
        documents.sort_by(|a, b| a.path.cmp(&b.path));

        Self {
            root: root.to_path_buf(),
            documents,
        }
    }

    pub fn top_level_count(&self) -> usize {
        self.documents.iter().filter(|d| d.top_level).count()
    }

    /// Plain-text tree, paths relative to the root:
    ///
    /// ```text
    /// daily.md [top-level]
    ///   imports shared/tools.md
    /// shared/tools.md
    ///   imported by daily.md
    /// ```
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for doc in &self.documents {
            out.push_str(&display_relative(&self.root, &doc.path));
            if doc.top_level {
                out.push_str(" [top-level]");
            }
            out.push('\n');
            for import in &doc.imports {
                out.push_str("  imports ");
                out.push_str(&display_relative(&self.root, import));
                out.push('\n');
            }
            for importer in &doc.importers {
                out.push_str("  imported by ");
                out.push_str(&display_relative(&self.root, importer));
                out.push('\n');
            }
        }
        out
    }
}
