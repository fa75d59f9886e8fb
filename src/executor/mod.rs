pub mod remediation;
pub mod safe;

pub use safe::{ExecutionPolicy, RunStatus, RunSummary, SafeExecutor};

use crate::parser::TOOL_TOKEN;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Result of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success { stdout: String },
    Failure { exit_code: i32, stderr: String },
    Timeout(Duration),
    UnexpectedError(String),
}

/// Runs the version-control tool with already tokenized arguments.
///
/// `args` excludes the tool token itself: `git checkout main` arrives as
/// `["checkout", "main"]`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[String], cwd: &Path, timeout: Duration) -> ExecutionOutcome;
}

/// Splits `command` shell-style and drops the leading tool token.
///
/// Returns `None` when the command does not invoke the tool. Unbalanced
/// quotes fall back to plain whitespace splitting.
pub fn tokenize(command: &str) -> Option<Vec<String>> {
    let mut tokens = shlex::split(command)
        .unwrap_or_else(|| command.split_whitespace().map(ToString::to_string).collect());
    if tokens.first().map(String::as_str) != Some(TOOL_TOKEN) {
        return None;
    }
    tokens.remove(0);
    Some(tokens)
}

/// Renders tokenized arguments back into a displayable command line.
pub fn render(args: &[String]) -> String {
    let mut line = String::from(TOOL_TOKEN);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Spawns the real `git` binary.
pub struct GitRunner {
    program: PathBuf,
}

impl GitRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolves `binary` on `PATH`; an unresolved name is kept as given so
    /// the spawn failure surfaces per command.
    pub fn locate(binary: &str) -> Self {
        match which::which(binary) {
            Ok(path) => Self::new(path),
            Err(e) => {
                warn!(binary, error = %e, "git binary not found on PATH");
                Self::new(binary)
            }
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl CommandRunner for GitRunner {
    async fn run(&self, args: &[String], cwd: &Path, timeout: Duration) -> ExecutionOutcome {
        debug!(program = %self.program.display(), ?args, cwd = %cwd.display(), "spawning");

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return ExecutionOutcome::UnexpectedError(format!(
                    "failed to start {}: {}",
                    self.program.display(),
                    e
                ))
            }
        };

        // Dropping the pending wait kills the child on timeout.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return ExecutionOutcome::UnexpectedError(e.to_string()),
            Err(_) => {
                warn!(?args, ?timeout, "command timed out");
                return ExecutionOutcome::Timeout(timeout);
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            ExecutionOutcome::Success { stdout }
        } else {
            ExecutionOutcome::Failure {
                exit_code: output.status.code().unwrap_or(-1),
                stderr,
            }
        }
    }
}
