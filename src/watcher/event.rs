//! Watch event types, options and debouncing state

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::EventKind;
use serde::Serialize;

use crate::config::Config;

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// What happened to a watched file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

impl ChangeKind {
    /// Map a notify event kind; access and unknown events are ignored
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(ChangeKind::Created),
            EventKind::Modify(_) => Some(ChangeKind::Modified),
            EventKind::Remove(_) => Some(ChangeKind::Deleted),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
        }
    }

    /// Settle the kind of a debounced change against the file system.
    ///
    /// Editors often save by delete + rename, so the last raw event is not
    /// trusted: a missing file is deleted, a file that reappeared after a
    /// delete is created.
    pub fn settle(self, path: &Path) -> Self {
        match (path.exists(), self) {
            (false, _) => ChangeKind::Deleted,
            (true, ChangeKind::Deleted) => ChangeKind::Created,
            (true, kind) => kind,
        }
    }
}

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory holding the workflow documents
    pub document_root: PathBuf,
    /// Config
    pub config: Config,
}

impl WatchOptions {
    /// Create new watch options with minimal required fields
    pub fn new(document_root: PathBuf) -> Self {
        Self {
            document_root,
            config: Config::default(),
        }
    }

    /// Set config
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.config.watch.debounce_ms)
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Watch started
    WatchStarted { root: String },
    /// Initial graph scan finished
    GraphBuilt {
        documents: usize,
        top_level: usize,
        warnings: usize,
    },
    /// A debounced change is about to be processed
    FileChanged { path: String, kind: ChangeKind },
    /// Impact query result for a change
    RebuildPlanned { path: String, affected: Vec<String> },
    /// A top-level document was compiled
    Compiled { path: String },
    /// The compiler failed for a top-level document
    CompileFailed { path: String, message: String },
    /// Non-fatal graph warning
    Warning { message: String },
    /// Error occurred
    Error { message: String },
    /// Watch stopped
    Shutdown,
}

impl WatchEvent {
    /// Convert to JSON string with "command": "watch" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Watcher state for debouncing
///
/// Changes to the same path coalesce; the latest raw kind wins until the
/// batch is settled on flush.
#[derive(Debug)]
pub struct WatcherState {
    pending_changes: HashMap<PathBuf, ChangeKind>,
    last_change: Option<Instant>,
    debounce: Duration,
}

impl Default for WatcherState {
    fn default() -> Self {
        Self::new()
    }
}

impl WatcherState {
    /// Create a new watcher state with the default debounce
    pub fn new() -> Self {
        Self::with_debounce(Duration::from_millis(DEBOUNCE_MS))
    }

    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            pending_changes: HashMap::new(),
            last_change: None,
            debounce,
        }
    }

    /// Add a file change to pending changes
    pub fn add_change(&mut self, path: PathBuf, kind: ChangeKind) {
        self.pending_changes.insert(path, kind);
        self.last_change = Some(Instant::now());
    }

    /// Check if debounce period has passed and we have pending changes
    pub fn should_flush(&self) -> bool {
        match self.last_change {
            Some(last) => !self.pending_changes.is_empty() && last.elapsed() >= self.debounce,
            None => false,
        }
    }

    /// Take all pending changes sorted by path, kinds settled against disk
    pub fn take_changes(&mut self) -> Vec<(PathBuf, ChangeKind)> {
        let mut changes: Vec<_> = self
            .pending_changes
            .drain()
            .map(|(path, kind)| {
                let settled = kind.settle(&path);
                (path, settled)
            })
            .collect();
        changes.sort_by(|a, b| a.0.cmp(&b.0));
        self.last_change = None;
        changes
    }

    /// Check if there are pending changes
    pub fn has_pending(&self) -> bool {
        !self.pending_changes.is_empty()
    }
}
