//! Core data models for Weft
//!
//! - `Frontmatter`: the subset of YAML metadata Weft cares about (imports)
//! - `ImportRef`: one textual import reference declared by a document
//! - `DocumentNode`: a document as stored in the dependency graph

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Import list declared in frontmatter.
///
/// Accepts both a list and a single string:
///
/// ```text
/// imports:
///   - shared/tools.md
///   - shared/safe-outputs.md#Issues
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ImportList(pub Vec<String>);

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ImportListDe {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for ImportList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match ImportListDe::deserialize(deserializer)? {
            ImportListDe::One(reference) => Ok(Self(vec![reference])),
            ImportListDe::Many(references) => Ok(Self(references)),
        }
    }
}

/// YAML frontmatter of a workflow document.
///
/// Every other key (triggers, permissions, engine, ...) belongs to the
/// compiler and is ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Frontmatter {
    #[serde(default)]
    pub imports: ImportList,
}

/// A textual import reference as written in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRef {
    /// Reference as declared, possibly with a `#Section` suffix
    pub reference: String,
    /// Declared with `?` - a missing target is expected, not a warning
    pub optional: bool,
}

impl ImportRef {
    /// A required import
    pub fn required(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            optional: false,
        }
    }

    /// An optional import (`{{#import? ...}}`, `@include? ...`)
    pub fn optional(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            optional: true,
        }
    }
}

/// One source document in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentNode {
    /// Canonical absolute path (unique key)
    pub path: PathBuf,
    /// Lives directly in the document root
    pub is_top_level: bool,
    /// Canonical absolute paths of resolved imports, in declaration order
    pub imports: Vec<PathBuf>,
}

impl DocumentNode {
    pub fn new(path: impl Into<PathBuf>, is_top_level: bool, imports: Vec<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_top_level,
            imports,
        }
    }
}
