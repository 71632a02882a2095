use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;
use weft::paths::display_relative;

use super::Project;

pub fn cmd_graph(project: &Project, root: Option<PathBuf>, json: bool) -> Result<()> {
    let document_root = project.document_root(root.as_deref());
    let (graph, report) = project.build_graph(&document_root)?;
    let snapshot = graph.snapshot();

    if !json {
        print!("{}", snapshot.render_text());
        return Ok(());
    }

    let relative = |paths: &[PathBuf]| -> Vec<String> {
        paths
            .iter()
            .map(|p| display_relative(&snapshot.root, p))
            .collect()
    };

    let mut out = std::io::stdout().lock();
    for doc in &snapshot.documents {
        crate::ui::json::write_event(
            &mut out,
            &crate::ui::json::event(
                "document",
                "graph",
                json!({
                    "path": display_relative(&snapshot.root, &doc.path),
                    "top_level": doc.top_level,
                    "imports": relative(&doc.imports),
                    "importers": relative(&doc.importers),
                }),
            ),
        )?;
    }
    crate::ui::json::write_event(
        &mut out,
        &crate::ui::json::event(
            "complete",
            "graph",
            json!({
                "root": snapshot.root.display().to_string(),
                "documents": snapshot.documents.len(),
                "top_level": snapshot.top_level_count(),
                "warnings": report.warnings.len(),
            }),
        ),
    )?;

    Ok(())
}
