//! Test environment for isolated weft CLI runs.
//!
//! Provides `TestEnv` - a temporary repository (`.git` marker plus
//! `.github/workflows`) and an isolated config home, with helpers to write
//! documents and run the `weft` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Document root inside every test repository
pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// Result of running a weft CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Non-empty stdout lines
    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout.lines().filter(|l| !l.trim().is_empty()).collect()
    }

    /// Parse every stdout line as JSON (NDJSON output)
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout_lines()
            .into_iter()
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("not JSON: {line}: {e}\n{}", self.stderr))
            })
            .collect()
    }
}

/// Isolated repository with temp directories.
pub struct TestEnv {
    /// Temporary repository root
    pub project_root: TempDir,
    /// Temporary `XDG_CONFIG_HOME`
    pub config_home: TempDir,
    weft_bin: PathBuf,
}

impl TestEnv {
    /// Empty repository with `.git` and `.github/workflows`
    pub fn new() -> Self {
        let project_root = tempfile::tempdir().expect("Failed to create project dir");
        let config_home = tempfile::tempdir().expect("Failed to create config home");
        std::fs::create_dir_all(project_root.path().join(".git")).expect("Failed to create .git");
        std::fs::create_dir_all(project_root.path().join(WORKFLOWS_DIR))
            .expect("Failed to create workflows dir");

        Self {
            project_root,
            config_home,
            weft_bin: PathBuf::from(env!("CARGO_BIN_EXE_weft")),
        }
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Get path relative to the workflows directory
    pub fn workflow_path(&self, relative: &str) -> PathBuf {
        self.project_path(WORKFLOWS_DIR).join(relative)
    }

    /// Write a file to the project directory
    pub fn write_project_file(&self, relative_path: &str, content: &str) {
        let full_path = self.project_path(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
    }

    /// Write a workflow document with the given frontmatter imports
    pub fn write_workflow(&self, relative_path: &str, imports: &[&str]) {
        self.write_project_file(
            &format!("{}/{}", WORKFLOWS_DIR, relative_path),
            &super::fixtures::workflow(imports),
        );
    }

    /// Run weft from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from(self.project_root.path(), args)
    }

    /// Run weft from the project root with extra env vars.
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        self.run_from_with_env(self.project_root.path(), args, env_vars)
    }

    /// Run weft from a specific directory
    pub fn run_from(&self, cwd: &Path, args: &[&str]) -> TestResult {
        self.run_from_with_env(cwd, args, &[])
    }

    /// Run weft from a specific directory with extra env vars.
    pub fn run_from_with_env(
        &self,
        cwd: &Path,
        args: &[&str],
        env_vars: &[(&str, &str)],
    ) -> TestResult {
        let mut cmd = Command::new(&self.weft_bin);
        cmd.current_dir(cwd)
            .args(args)
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env_remove("RUST_LOG")
            .env_remove("WEFT_SOURCE_DIR")
            .env_remove("WEFT_DEBOUNCE_MS")
            .env_remove("WEFT_VERBOSITY")
            .env_remove("WEFT_COMPILE_COMMAND");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute weft");
        Self::output_to_result(output)
    }

    fn output_to_result(output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
