//! External process execution
//!
//! Every external command (container runtime, package manager) goes through the
//! [`CommandRunner`] trait so the orchestration can be exercised without a
//! docker daemon. Results are typed: a process either succeeded, exited with a
//! failure, or could not be found at all.

mod docker;
mod mock;
mod system;

pub use docker::{DockerCli, RunSpec, VolumeMount};
pub use mock::MockRunner;
pub use system::SystemRunner;

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors starting a process, other than the program being absent
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// A single external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory of the child; the orchestrator's own cwd is never changed
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Parses a whitespace-separated command line such as `sudo apt-get install -y docker.io`
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program).args(parts))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// First argument, typically the runtime subcommand (`pull`, `run`, ...)
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How an external process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Success,
    /// Exited unsuccessfully; `code` is `None` when killed by a signal
    Failed { code: Option<i32> },
    /// The program could not be found
    NotFound,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        matches!(self, ProcessOutcome::Success)
    }
}

impl fmt::Display for ProcessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessOutcome::Success => write!(f, "success"),
            ProcessOutcome::Failed { code: Some(code) } => write!(f, "exit code {}", code),
            ProcessOutcome::Failed { code: None } => write!(f, "terminated by signal"),
            ProcessOutcome::NotFound => write!(f, "command not found"),
        }
    }
}

/// Outcome plus captured output of a process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub outcome: ProcessOutcome,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn not_found() -> Self {
        Self {
            outcome: ProcessOutcome::NotFound,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// Runs external commands, blocking the caller until they exit
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs with inherited stdio so build output streams to the terminal
    async fn status(&self, invocation: &Invocation) -> Result<ProcessOutcome, RunnerError>;

    /// Runs with captured stdout/stderr
    async fn output(&self, invocation: &Invocation) -> Result<CapturedOutput, RunnerError>;
}
