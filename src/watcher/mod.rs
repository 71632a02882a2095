//! File watcher for incremental rebuilds
//!
//! Implements the `watch` command with:
//! - Debouncing (configurable, 100ms default)
//! - Incremental graph updates (only the changed document is re-read)
//! - Impact-driven compilation of affected top-level documents
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for CI

mod event;
mod session;
mod sync;

pub use event::{ChangeKind, WatchEvent, WatchOptions, WatcherState, DEBOUNCE_MS};
pub use session::{ChangeOutcome, WatchSession};
pub use sync::{compute_content_hash, hash_file, process_change, watch};
