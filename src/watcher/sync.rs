//! Watch loop: notify events → debounced changes → graph session

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use sha2::{Digest, Sha256};

use crate::compiler::Compiler;
use crate::error::WeftResult;
use crate::graph::DependencyGraph;
use crate::parser::ImportExtractor;
use crate::paths::{canonicalize_lossy, display_relative};
use crate::resolver::ImportCache;

use super::event::{ChangeKind, WatchEvent, WatchOptions, WatcherState};
use super::session::WatchSession;

/// How long one receive waits before re-checking the running flag
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Start watching the document root; blocks until `running` is cleared.
///
/// The graph is built once up front. After that every debounced change is
/// handed to a [`WatchSession`] and its outcome reported through
/// `on_event`.
pub fn watch<C: Compiler>(
    options: WatchOptions,
    compiler: C,
    running: Arc<AtomicBool>,
    on_event: impl Fn(WatchEvent),
) -> WeftResult<()> {
    let root = canonicalize_lossy(&options.document_root);
    on_event(WatchEvent::WatchStarted {
        root: root.display().to_string(),
    });

    let mut graph = DependencyGraph::from_config(&root, &options.config)?;
    let report = graph.build().inspect_err(|e| {
        on_event(WatchEvent::Error {
            message: e.to_string(),
        })
    })?;

    on_event(WatchEvent::GraphBuilt {
        documents: graph.len(),
        top_level: graph.top_level_documents().len(),
        warnings: report.warnings.len(),
    });
    for warning in &report.warnings {
        on_event(WatchEvent::Warning {
            message: warning.to_string(),
        });
    }

    // Seed hashes so the first save of an untouched file is not "new"
    let mut content_hashes: HashMap<PathBuf, String> = graph
        .snapshot()
        .documents
        .into_iter()
        .filter_map(|doc| hash_file(&doc.path).map(|hash| (doc.path, hash)))
        .collect();

    let mut session = WatchSession::new(graph, compiler);

    let (tx, rx) = channel::<Event>();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.send(event);
            }
        },
        notify::Config::default(),
    )?;
    watcher.watch(&root, RecursiveMode::Recursive)?;

    let mut state = WatcherState::with_debounce(options.debounce());

    while running.load(Ordering::SeqCst) {
        if let Ok(event) = rx.recv_timeout(POLL_INTERVAL) {
            if let Some(kind) = ChangeKind::from_notify(&event.kind) {
                for path in event.paths {
                    let path = canonicalize_lossy(&path);
                    if !session.graph().is_candidate(&path) {
                        continue;
                    }
                    // Filter out editor auto-save noise
                    if !content_changed(&mut content_hashes, &path) {
                        continue;
                    }
                    state.add_change(path, kind);
                }
            }
        }

        if state.should_flush() {
            for (path, kind) in state.take_changes() {
                process_change(&mut session, &root, &path, kind, &on_event);
            }
        }
    }

    on_event(WatchEvent::Shutdown);
    Ok(())
}

/// Handle one settled change and report it
pub fn process_change<C, E, R>(
    session: &mut WatchSession<C, E, R>,
    root: &Path,
    path: &Path,
    kind: ChangeKind,
    on_event: &impl Fn(WatchEvent),
) where
    C: Compiler,
    E: ImportExtractor,
    R: ImportCache,
{
    on_event(WatchEvent::FileChanged {
        path: display_relative(root, path),
        kind,
    });

    let outcome = session.handle_change(path, kind);

    for warning in &outcome.warnings {
        on_event(WatchEvent::Warning {
            message: warning.to_string(),
        });
    }
    on_event(WatchEvent::RebuildPlanned {
        path: display_relative(root, path),
        affected: outcome
            .affected
            .iter()
            .map(|p| display_relative(root, p))
            .collect(),
    });
    for compiled in &outcome.compiled {
        on_event(WatchEvent::Compiled {
            path: display_relative(root, compiled),
        });
    }
    for (failed, message) in &outcome.failures {
        on_event(WatchEvent::CompileFailed {
            path: display_relative(root, failed),
            message: message.clone(),
        });
    }
}

/// SHA-256 of a file's bytes, `sha256:`-prefixed
pub fn hash_file(path: &Path) -> Option<String> {
    std::fs::read(path).ok().map(|bytes| compute_content_hash(&bytes))
}

/// SHA-256 of content, `sha256:`-prefixed
pub fn compute_content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{:x}", hasher.finalize())
}

/// Record the current hash of `path`; false if it did not change
fn content_changed(hashes: &mut HashMap<PathBuf, String>, path: &Path) -> bool {
    match hash_file(path) {
        Some(hash) => {
            let previous = hashes.insert(path.to_path_buf(), hash.clone());
            previous.as_deref() != Some(hash.as_str())
        }
        None => {
            hashes.remove(path);
            true
        }
    }
}
