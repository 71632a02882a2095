//! Compiler port
//!
//! Weft never compiles documents itself. It hands each affected top-level
//! document to a [`Compiler`], once per change event.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::config::CompileConfig;
use crate::error::{WeftError, WeftResult};

/// Turns one top-level document into its generated artifact
pub trait Compiler {
    fn compile(&mut self, path: &Path) -> WeftResult<()>;
}

/// Runs an external command with the document path as last argument,
/// e.g. `gh aw compile <path>`
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandCompiler {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
        }
    }

    pub fn from_config(config: &CompileConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    /// Run the command from `dir` (normally the project root)
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Human-readable command line without the path
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Compiler for CommandCompiler {
    fn compile(&mut self, path: &Path) -> WeftResult<()> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(path);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        debug!(command = %self.command_line(), path = %path.display(), "invoking compiler");
        let output = command.output().map_err(|e| WeftError::Compile {
            path: path.to_path_buf(),
            message: format!("cannot run '{}': {}", self.program, e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("'{}' exited with {}", self.command_line(), output.status),
                trimmed => trimmed.to_string(),
            };
            return Err(WeftError::Compile {
                path: path.to_path_buf(),
                message,
            });
        }

        info!(path = %path.display(), "compiled");
        Ok(())
    }
}

/// Compiler that does nothing (`weft watch --no-compile`)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompiler;

impl Compiler for NoopCompiler {
    fn compile(&mut self, _path: &Path) -> WeftResult<()> {
        Ok(())
    }
}
