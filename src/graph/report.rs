//! Non-fatal outcomes of building or updating the graph

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// What went wrong for a single document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A subdirectory below the root could not be listed
    Discovery,
    /// The document could not be read or parsed; kept with no imports
    Extraction,
    /// A declared import could not be mapped to a file; edge omitted
    Resolution,
}

/// A recoverable failure, surfaced to the caller instead of raised
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphWarning {
    pub path: PathBuf,
    pub kind: WarningKind,
    pub message: String,
}

impl GraphWarning {
    pub fn new(path: impl Into<PathBuf>, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            WarningKind::Discovery => "discovery",
            WarningKind::Extraction => "extraction",
            WarningKind::Resolution => "resolution",
        };
        write!(f, "{} ({}): {}", self.path.display(), label, self.message)
    }
}

/// Summary of a full [`super::DependencyGraph::build`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// Candidate documents found under the root
    pub discovered: usize,
    /// Documents inserted by this build
    pub inserted: usize,
    /// Documents already present and left untouched
    pub skipped: usize,
    pub warnings: Vec<GraphWarning>,
}

impl BuildReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
