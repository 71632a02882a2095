use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use weft::watcher::{watch, WatchEvent, WatchOptions};
use weft::{CommandCompiler, Compiler, NoopCompiler};

use super::Project;

pub fn cmd_watch(project: &Project, root: Option<PathBuf>, no_compile: bool, json: bool) -> Result<()> {
    let document_root = project.document_root(root.as_deref());
    let options = WatchOptions::new(document_root).with_config(project.config.clone());

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("cannot install Ctrl+C handler")?;

    if no_compile {
        run(options, NoopCompiler, running, json)
    } else {
        let compiler =
            CommandCompiler::from_config(&project.config.compile).with_working_dir(&project.root);
        if !json {
            println!("Compiling with: {}", compiler.command_line());
        }
        run(options, compiler, running, json)
    }
}

fn run<C: Compiler>(
    options: WatchOptions,
    compiler: C,
    running: Arc<AtomicBool>,
    json: bool,
) -> Result<()> {
    watch(options, compiler, running, |event| {
        if json {
            println!("{}", event.to_json());
            return;
        }
        let line = render_event(&event);
        match event {
            WatchEvent::Error { .. } | WatchEvent::CompileFailed { .. } => {
                eprintln!("[{}] {}", timestamp(), line)
            }
            _ => println!("[{}] {}", timestamp(), line),
        }
    })?;
    Ok(())
}

fn render_event(event: &WatchEvent) -> String {
    match event {
        WatchEvent::WatchStarted { root } => format!("Watching {} (Ctrl+C to stop)", root),
        WatchEvent::GraphBuilt {
            documents,
            top_level,
            warnings,
        } => format!(
            "Graph built: {} documents, {} top-level, {} warnings",
            documents, top_level, warnings
        ),
        WatchEvent::FileChanged { path, kind } => format!("{:?}: {}", kind, path),
        WatchEvent::RebuildPlanned { affected, .. } if affected.is_empty() => {
            "Nothing to rebuild".to_string()
        }
        WatchEvent::RebuildPlanned { affected, .. } => {
            format!("Rebuilding {}", affected.join(", "))
        }
        WatchEvent::Compiled { path } => format!("Compiled {}", path),
        WatchEvent::CompileFailed { path, message } => format!("Failed {}: {}", path, message),
        WatchEvent::Warning { message } => format!("Warning: {}", message),
        WatchEvent::Error { message } => format!("Error: {}", message),
        WatchEvent::Shutdown => "Stopped".to_string(),
    }
}

fn timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 86_400;
            format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
        })
        .unwrap_or_else(|_| "00:00:00".to_string())
}
