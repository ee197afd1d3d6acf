use super::{CapturedOutput, CommandRunner, Invocation, ProcessOutcome, RunnerError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Runs commands as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

fn outcome(status: ExitStatus) -> ProcessOutcome {
    if status.success() {
        ProcessOutcome::Success
    } else {
        ProcessOutcome::Failed {
            code: status.code(),
        }
    }
}

fn spawn_error(invocation: &Invocation, source: std::io::Error) -> RunnerError {
    RunnerError::Spawn {
        program: invocation.program.clone(),
        source,
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn status(&self, invocation: &Invocation) -> Result<ProcessOutcome, RunnerError> {
        debug!(command = %invocation, "Running");

        let result = Self::command(invocation)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await;

        match result {
            Ok(status) => Ok(outcome(status)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ProcessOutcome::NotFound),
            Err(e) => Err(spawn_error(invocation, e)),
        }
    }

    async fn output(&self, invocation: &Invocation) -> Result<CapturedOutput, RunnerError> {
        debug!(command = %invocation, "Running (captured)");

        let result = Self::command(invocation)
            .stdin(Stdio::null())
            .output()
            .await;

        match result {
            Ok(out) => Ok(CapturedOutput {
                outcome: outcome(out.status),
                stdout: String::from_utf8_lossy(&out.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(CapturedOutput::not_found()),
            Err(e) => Err(spawn_error(invocation, e)),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let runner = SystemRunner::new();
        let inv = Invocation::new("influxdb-builder-definitely-missing-binary").arg("--version");
        assert_eq!(runner.status(&inv).await.unwrap(), ProcessOutcome::NotFound);
        assert_eq!(
            runner.output(&inv).await.unwrap().outcome,
            ProcessOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_failed_exit_code_is_reported() {
        let runner = SystemRunner::new();
        let inv = Invocation::new("sh").args(["-c", "exit 3"]);
        assert_eq!(
            runner.status(&inv).await.unwrap(),
            ProcessOutcome::Failed { code: Some(3) }
        );
    }

    #[tokio::test]
    async fn test_output_is_captured_and_trimmed() {
        let runner = SystemRunner::new();
        let inv = Invocation::new("sh").args(["-c", "echo '  hello  '"]);
        let out = runner.output(&inv).await.unwrap();
        assert!(out.outcome.success());
        assert_eq!(out.stdout, "hello");
    }

    #[tokio::test]
    async fn test_current_dir_applies_to_child() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = SystemRunner::new();
        let inv = Invocation::new("pwd").current_dir(dir.path());
        let out = runner.output(&inv).await.unwrap();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(
            std::path::Path::new(&out.stdout).canonicalize().unwrap(),
            expected
        );
    }
}
