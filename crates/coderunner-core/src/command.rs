//! Shell command execution with captured output.
//!
//! Compile and run commands arrive as free-form strings and are handed to
//! the shell as a single `-c` argument. Argument values are appended to that
//! string, so a value containing shell syntax is interpreted by the shell.
//! Callers that accept commands from untrusted users inherit that exposure.

use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use tracing::debug;
use tracing::warn;

use crate::RunnerError;
use crate::workspace::WorkDir;

/// A complete shell command line.
///
/// # Examples
///
/// ```
/// use coderunner_core::command::CommandLine;
///
/// let line = CommandLine::new("echo hi").with_args(["there"]);
/// assert_eq!(line.as_str(), "echo hi there");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(String);

impl CommandLine {
    /// Creates a command line from a base command.
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Appends each value, in order, separated by a single space.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.0.push(' ');
            self.0.push_str(arg.as_ref());
        }
        self
    }

    /// Returns the command line.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// The command line that was executed.
    pub command: String,
    /// stdout on success; stdout, `"\n"`, stderr on failure.
    pub output: String,
    /// `None` on success, otherwise the exit status or spawn error.
    pub failure: Option<String>,
}

impl CommandResult {
    /// Returns `true` if the command exited with status zero.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Converts a failed result into `RunnerError::Command`.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Command` carrying the captured output if the
    /// command did not succeed.
    pub fn into_result(self) -> Result<Self, RunnerError> {
        match self.failure {
            None => Ok(self),
            Some(reason) => Err(RunnerError::Command {
                command: self.command,
                output: self.output,
                reason,
            }),
        }
    }

    fn from_output(command: &CommandLine, output: &Output) -> Self {
        let stdout = String::from_utf8_lossy(&output.stdout);
        if output.status.success() {
            return Self {
                command: command.to_string(),
                output: stdout.into_owned(),
                failure: None,
            };
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Self {
            command: command.to_string(),
            output: format!("{stdout}\n{stderr}"),
            failure: Some(output.status.to_string()),
        }
    }
}

/// Runs command lines through a shell, one at a time, to completion.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    shell: PathBuf,
}

impl CommandRunner {
    /// Creates a runner that invokes `<shell> -c <line>`.
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Runs `line` with `dir` as the child's working directory.
    ///
    /// Blocks until the child exits; stdout and stderr are fully buffered.
    /// The calling process's working directory is never changed.
    #[must_use]
    pub fn run(&self, line: &CommandLine, dir: &WorkDir) -> CommandResult {
        debug!(command = %line, dir = %dir.as_path().display(), "running command");

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(line.as_str())
            .current_dir(dir.as_path())
            .output();

        match output {
            Ok(output) => {
                let result = CommandResult::from_output(line, &output);
                if let Some(reason) = &result.failure {
                    warn!(command = %line, %reason, "command failed");
                }
                result
            }
            Err(e) => {
                warn!(command = %line, error = %e, "failed to spawn command");
                CommandResult {
                    command: line.to_string(),
                    output: "\n".to_string(),
                    failure: Some(format!("failed to spawn {}: {e}", self.shell.display())),
                }
            }
        }
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SHELL)
    }
}
