use std::path::PathBuf;

use anyhow::{bail, Result};
use serde_json::json;
use weft::paths::display_relative;

use super::Project;

pub fn cmd_check(project: &Project, root: Option<PathBuf>, strict: bool, json: bool) -> Result<()> {
    let document_root = project.document_root(root.as_deref());
    let (graph, report) = project.build_graph(&document_root)?;
    let root = graph.root().to_path_buf();
    let top_level = graph.top_level_documents().len();

    if json {
        let mut out = std::io::stdout().lock();
        for warning in &report.warnings {
            crate::ui::json::write_event(
                &mut out,
                &crate::ui::json::event(
                    "warning",
                    "check",
                    json!({
                        "path": display_relative(&root, &warning.path),
                        "kind": warning.kind,
                        "message": warning.message,
                    }),
                ),
            )?;
        }
        crate::ui::json::write_event(
            &mut out,
            &crate::ui::json::event(
                "complete",
                "check",
                json!({
                    "documents": graph.len(),
                    "top_level": top_level,
                    "warnings": report.warnings.len(),
                    "passed": !(strict && report.has_warnings()),
                }),
            ),
        )?;
    } else {
        for warning in &report.warnings {
            println!(
                "warning: {}: {}",
                display_relative(&root, &warning.path),
                warning.message
            );
        }
        println!(
            "{} documents ({} top-level), {} warnings",
            graph.len(),
            top_level,
            report.warnings.len()
        );
    }

    if strict && report.has_warnings() {
        bail!(
            "check failed: {} warnings (--strict)",
            report.warnings.len()
        );
    }
    Ok(())
}
