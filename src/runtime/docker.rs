//! Container runtime command-line client
//!
//! Renders the handful of docker CLI calls the builder needs and executes them
//! through a [`CommandRunner`].

use super::{CapturedOutput, CommandRunner, Invocation, ProcessOutcome, RunnerError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Host directory bound into a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub host_path: PathBuf,
    pub container_path: String,
    pub read_only: bool,
}

impl VolumeMount {
    fn to_arg(&self) -> String {
        let mut arg = format!("{}:{}", self.host_path.display(), self.container_path);
        if self.read_only {
            arg.push_str(":ro");
        }
        arg
    }
}

/// Parameters of an ephemeral `run --rm` execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub name: String,
    pub image: String,
    pub volumes: Vec<VolumeMount>,
    pub command: Vec<String>,
}

/// Docker-compatible CLI driven through a [`CommandRunner`]
#[derive(Clone)]
pub struct DockerCli {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl DockerCli {
    pub fn new(program: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn version_invocation(&self) -> Invocation {
        Invocation::new(&self.program).arg("--version")
    }

    pub fn pull_invocation(&self, image: &str) -> Invocation {
        Invocation::new(&self.program).args(["pull", image])
    }

    pub fn run_invocation(&self, spec: &RunSpec) -> Invocation {
        let mut inv = Invocation::new(&self.program).args(["run", "--rm"]);
        for volume in &spec.volumes {
            inv = inv.arg("-v").arg(volume.to_arg());
        }
        inv.args(["--name", spec.name.as_str(), spec.image.as_str()])
            .args(spec.command.iter().cloned())
    }

    pub fn build_invocation(&self, tag: &str, context_dir: &Path) -> Invocation {
        Invocation::new(&self.program)
            .args(["build", "-t", tag, "."])
            .current_dir(context_dir)
    }

    pub fn images_invocation(&self, name: &str) -> Invocation {
        Invocation::new(&self.program).args(["images", name])
    }

    /// Version probe; `NotFound` means the runtime binary is not installed
    pub async fn version(&self) -> Result<CapturedOutput, RunnerError> {
        self.runner.output(&self.version_invocation()).await
    }

    pub async fn pull(&self, image: &str) -> Result<ProcessOutcome, RunnerError> {
        self.runner.status(&self.pull_invocation(image)).await
    }

    /// Runs an auto-removed container and waits for it to exit
    pub async fn run(&self, spec: &RunSpec) -> Result<ProcessOutcome, RunnerError> {
        self.runner.status(&self.run_invocation(spec)).await
    }

    /// Builds an image from `context_dir`, which holds the container build descriptor
    pub async fn build(&self, tag: &str, context_dir: &Path) -> Result<ProcessOutcome, RunnerError> {
        self.runner
            .status(&self.build_invocation(tag, context_dir))
            .await
    }

    pub async fn images(&self, name: &str) -> Result<CapturedOutput, RunnerError> {
        self.runner.output(&self.images_invocation(name)).await
    }
}
