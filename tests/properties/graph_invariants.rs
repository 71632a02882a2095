//! Property tests for the dependency graph.
//!
//! Random document sets are written to a temporary repository, built, and
//! checked against a brute-force reachability oracle. Random update/remove
//! sequences must keep the reverse index equal to the inversion of the
//! import lists.

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use weft::DependencyGraph;

/// Document `i` is `wI.md` (top-level) or `shared/fI.md` (fragment)
#[derive(Debug, Clone)]
struct Doc {
    top_level: bool,
    imports: Vec<usize>,
}

fn docs() -> impl Strategy<Value = Vec<Doc>> {
    (2usize..=8).prop_flat_map(|n| {
        proptest::collection::vec(
            (any::<bool>(), proptest::collection::vec(0..n, 0..=3))
                .prop_map(|(top_level, imports)| Doc { top_level, imports }),
            n,
        )
    })
}

#[derive(Debug, Clone)]
enum Op {
    /// Rewrite document with a new import list, then `update`
    Rewrite(usize, Vec<usize>),
    /// Delete the file, then `remove`
    Delete(usize),
    /// Write the file back (no imports), then `update`
    Recreate(usize),
}

fn ops(n: usize) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        (0..n, proptest::collection::vec(0..n, 0..=3)).prop_map(|(i, imports)| Op::Rewrite(i, imports)),
        (0..n).prop_map(Op::Delete),
        (0..n).prop_map(Op::Recreate),
    ];
    proptest::collection::vec(op, 1..=12)
}

struct Repo {
    _dir: TempDir,
    root: PathBuf,
    docs: Vec<Doc>,
}

impl Repo {
    fn new(docs: Vec<Doc>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().canonicalize().unwrap();
        fs::create_dir_all(repo.join(".git")).unwrap();
        let root = repo.join(".github/workflows");
        fs::create_dir_all(root.join("shared")).unwrap();

        let repo = Self {
            _dir: dir,
            root,
            docs,
        };
        for i in 0..repo.docs.len() {
            repo.write(i);
        }
        repo
    }

    fn path(&self, i: usize) -> PathBuf {
        if self.docs[i].top_level {
            self.root.join(format!("w{}.md", i))
        } else {
            self.root.join(format!("shared/f{}.md", i))
        }
    }

    /// Import reference from document `from` to document `to`
    fn reference(&self, from: usize, to: usize) -> String {
        match (self.docs[from].top_level, self.docs[to].top_level) {
            (true, true) => format!("w{}.md", to),
            (true, false) => format!("shared/f{}.md", to),
            (false, true) => format!("../w{}.md", to),
            (false, false) => format!("f{}.md", to),
        }
    }

    fn write(&self, i: usize) {
        let mut content = String::from("---\non: push\n");
        if !self.docs[i].imports.is_empty() {
            content.push_str("imports:\n");
            for &to in &self.docs[i].imports {
                content.push_str(&format!("  - {}\n", self.reference(i, to)));
            }
        }
        content.push_str("---\n# doc\n");
        fs::write(self.path(i), content).unwrap();
    }

    fn graph(&self) -> DependencyGraph {
        let mut graph = DependencyGraph::new(&self.root);
        graph.build().unwrap();
        graph
    }

    /// Top-level documents reaching `target` through fragments only
    fn oracle(&self, target: usize) -> BTreeSet<PathBuf> {
        if self.docs[target].top_level {
            return BTreeSet::from([self.path(target)]);
        }

        let mut affected = BTreeSet::new();
        for start in (0..self.docs.len()).filter(|&i| self.docs[i].top_level) {
            let mut visited = BTreeSet::from([start]);
            let mut stack = vec![start];
            while let Some(current) = stack.pop() {
                for &next in &self.docs[current].imports {
                    if next == target {
                        affected.insert(self.path(start));
                    }
                    if !self.docs[next].top_level && visited.insert(next) {
                        stack.push(next);
                    }
                }
            }
        }
        affected
    }
}

/// Every current node's importer set equals the nodes that list it
fn assert_reverse_is_inversion(graph: &DependencyGraph) -> Result<(), TestCaseError> {
    let snapshot = graph.snapshot();
    let mut expected: BTreeMap<&Path, BTreeSet<&Path>> = snapshot
        .documents
        .iter()
        .map(|doc| (doc.path.as_path(), BTreeSet::new()))
        .collect();

    for doc in &snapshot.documents {
        for import in &doc.imports {
            if let Some(importers) = expected.get_mut(import.as_path()) {
                importers.insert(doc.path.as_path());
            }
        }
    }

    for doc in &snapshot.documents {
        let actual: BTreeSet<&Path> = doc.importers.iter().map(PathBuf::as_path).collect();
        prop_assert_eq!(
            &actual,
            &expected[doc.path.as_path()],
            "importers of {}",
            doc.path.display()
        );
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: impact answers match brute-force reachability.
    #[test]
    fn property_affected_matches_oracle(docs in docs()) {
        let repo = Repo::new(docs);
        let graph = repo.graph();

        for i in 0..repo.docs.len() {
            prop_assert_eq!(
                graph.affected_workflows(&repo.path(i)),
                repo.oracle(i),
                "document {}",
                i
            );
        }
    }

    /// PROPERTY: rebuilding a built graph changes nothing.
    #[test]
    fn property_build_is_idempotent(docs in docs()) {
        let repo = Repo::new(docs);
        let mut graph = repo.graph();
        let before = graph.snapshot();

        let report = graph.build().unwrap();

        prop_assert_eq!(report.inserted, 0);
        prop_assert_eq!(graph.snapshot(), before);
    }

    /// PROPERTY: after any update/remove sequence the reverse index is the
    /// inversion of the import lists, and matches a fresh build.
    #[test]
    fn property_incremental_matches_fresh_build(
        (docs, ops) in docs().prop_flat_map(|docs| {
            let n = docs.len();
            (Just(docs), ops(n))
        })
    ) {
        let mut repo = Repo::new(docs);
        let mut graph = repo.graph();
        let mut present = vec![true; repo.docs.len()];

        for op in ops {
            match op {
                Op::Rewrite(i, imports) => {
                    if !present[i] {
                        continue;
                    }
                    repo.docs[i].imports = imports;
                    repo.write(i);
                    graph.update(&repo.path(i));
                }
                Op::Delete(i) => {
                    if !present[i] {
                        continue;
                    }
                    fs::remove_file(repo.path(i)).unwrap();
                    present[i] = false;
                    prop_assert!(graph.remove(&repo.path(i)));
                    prop_assert!(!graph.has_importers_entry(&repo.path(i)));
                }
                Op::Recreate(i) => {
                    if present[i] {
                        continue;
                    }
                    repo.docs[i].imports.clear();
                    repo.write(i);
                    present[i] = true;
                    graph.update(&repo.path(i));
                }
            }
            assert_reverse_is_inversion(&graph)?;
        }

        // Import lists may still name deleted files until their importer is
        // re-read, so compare importer sets, which only cover live nodes.
        let fresh = repo.graph();
        for i in (0..repo.docs.len()).filter(|&i| present[i]) {
            prop_assert_eq!(
                graph.importers_of(&repo.path(i)),
                fresh.importers_of(&repo.path(i)),
                "importers of document {}",
                i
            );
        }
    }
}
