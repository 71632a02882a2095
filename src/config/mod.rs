//! Configuration module for Weft
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (WEFT_*)
//! 3. Project config (`weft.toml` in the project root)
//! 4. User config (`$XDG_CONFIG_HOME/weft/config.toml`)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{ConfigWarning, PROJECT_CONFIG_FILE};
pub use types::{
    CompileConfig, Config, OutputConfig, ResolveConfig, SourceConfig, Verbosity, WatchConfig,
};
