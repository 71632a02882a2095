use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;
use tracing::info;
use weft::paths::display_relative;

use super::Project;

pub fn cmd_affected(
    project: &Project,
    paths: &[PathBuf],
    root: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let document_root = project.document_root(root.as_deref());
    let (graph, _report) = project.build_graph(&document_root)?;
    let root = graph.root().to_path_buf();

    let mut affected = BTreeSet::new();
    for path in paths {
        let changed = project.absolute(path);
        let workflows = graph.affected_workflows(&changed);
        info!(path = %changed.display(), affected = workflows.len(), "impact query");
        affected.extend(workflows);
    }

    let affected: Vec<String> = affected
        .iter()
        .map(|p| display_relative(&root, p))
        .collect();

    if json {
        let changed: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        crate::ui::json::emit(crate::ui::json::event(
            "affected",
            "affected",
            json!({
                "root": root.display().to_string(),
                "changed": changed,
                "affected": affected,
            }),
        ))?;
    } else {
        for path in &affected {
            println!("{}", path);
        }
    }

    Ok(())
}
