//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{WeftError, WeftResult};

use super::types::{Config, Verbosity};

/// Project config file name, looked up in the project root
pub const PROJECT_CONFIG_FILE: &str = "weft.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> WeftResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| WeftError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|dotted| {
            let key = dotted
                .rsplit('.')
                .next()
                .unwrap_or(dotted.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults; env overrides last.
///
/// A config file that fails to parse is logged and skipped.
pub fn load_or_default(project_root: Option<&Path>) -> (Config, Vec<ConfigWarning>) {
    let project_config = project_root.map(|root| root.join(PROJECT_CONFIG_FILE));
    let user_config = user_config_dir().map(|dir| dir.join("weft/config.toml"));

    for candidate in project_config.into_iter().chain(user_config) {
        if !candidate.exists() {
            continue;
        }
        match load_with_warnings(&candidate) {
            Ok((config, warnings)) => return (with_env_overrides(config), warnings),
            Err(e) => warn!(file = %candidate.display(), error = %e, "ignoring unreadable config"),
        }
    }

    (with_env_overrides(Config::default()), Vec::new())
}

/// Apply environment variable overrides (WEFT_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    if let Ok(dir) = std::env::var("WEFT_SOURCE_DIR") {
        if !dir.trim().is_empty() {
            config.source.dir = PathBuf::from(dir);
        }
    }

    if let Ok(ms) = std::env::var("WEFT_DEBOUNCE_MS") {
        match ms.trim().parse::<u64>() {
            Ok(ms) => config.watch.debounce_ms = ms,
            Err(_) => warn!(value = %ms, "ignoring invalid WEFT_DEBOUNCE_MS"),
        }
    }

    if let Ok(verbosity) = std::env::var("WEFT_VERBOSITY") {
        config.output.verbosity = match verbosity.to_lowercase().as_str() {
            "quiet" => Verbosity::Quiet,
            "verbose" => Verbosity::Verbose,
            "debug" => Verbosity::Debug,
            _ => Verbosity::Normal,
        };
    }

    if let Ok(command) = std::env::var("WEFT_COMPILE_COMMAND") {
        let mut parts = command.split_whitespace().map(str::to_string);
        if let Some(program) = parts.next() {
            config.compile.command = program;
            config.compile.args = parts.collect();
        }
    }

    config
}

/// `$XDG_CONFIG_HOME`, else the platform config dir
fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "source",
        "dir",
        "extensions",
        "exclude",
        "resolve",
        "markers",
        "cache_dir",
        "watch",
        "debounce_ms",
        "compile",
        "command",
        "args",
        "output",
        "verbosity",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (*candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let b_bytes = b.as_bytes();
    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a.as_bytes().iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let substitution = prev[j] + usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(substitution);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_bytes.len()]
}
