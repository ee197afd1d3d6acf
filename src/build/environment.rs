//! Build environment preparation
//!
//! Before anything is compiled the host needs an output directory, a working
//! container runtime, and a local copy of the toolchain image. A missing runtime
//! is the one recoverable case: the configured package-manager command is run
//! and the probe repeated.

use super::BuildError;
use crate::runtime::{CommandRunner, DockerCli, Invocation, ProcessOutcome};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// State of the host after preparation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildEnvironment {
    pub runtime_available: bool,
    pub base_image_pulled: bool,
    pub output_dir_exists: bool,
}

impl BuildEnvironment {
    /// A failed pull does not block the build; the run itself reports an unusable image
    pub fn is_ready(&self) -> bool {
        self.runtime_available && self.output_dir_exists
    }
}

pub struct EnvironmentPreparer {
    docker: DockerCli,
    runner: Arc<dyn CommandRunner>,
    install: Option<Invocation>,
    base_image: String,
    output_dir: PathBuf,
}

impl EnvironmentPreparer {
    pub fn new(
        docker: DockerCli,
        runner: Arc<dyn CommandRunner>,
        install_command: &str,
        base_image: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            docker,
            runner,
            install: Invocation::from_command_line(install_command),
            base_image: base_image.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Prepares the host, failing on any unrecoverable setup error
    pub async fn prepare(&self) -> Result<BuildEnvironment, BuildError> {
        let mut env = BuildEnvironment::default();

        self.ensure_output_dir(&mut env)?;
        self.ensure_runtime(&mut env).await?;
        self.pull_base_image(&mut env).await;

        Ok(env)
    }

    fn ensure_output_dir(&self, env: &mut BuildEnvironment) -> Result<(), BuildError> {
        if self.output_dir.is_dir() {
            debug!(path = %self.output_dir.display(), "Output directory already present");
        } else {
            debug!(path = %self.output_dir.display(), "Creating output directory");
            create_dir(&self.output_dir).map_err(|source| BuildError::OutputDir {
                path: self.output_dir.clone(),
                source,
            })?;
        }

        env.output_dir_exists = true;
        Ok(())
    }

    async fn ensure_runtime(&self, env: &mut BuildEnvironment) -> Result<(), BuildError> {
        debug!(runtime = %self.docker.program(), "Testing if container runtime is available");

        if !self.probe().await? {
            debug!("{} binary not found", self.docker.program());
            self.install_runtime().await?;

            if !self.probe().await? {
                return Err(BuildError::RuntimeUnavailable {
                    runtime: self.docker.program().to_string(),
                });
            }
        }

        env.runtime_available = true;
        Ok(())
    }

    /// Runs the version probe; `false` means the runtime binary was not found.
    /// A runtime that is found but fails is fatal.
    async fn probe(&self) -> Result<bool, BuildError> {
        let out = self.docker.version().await?;
        match out.outcome {
            ProcessOutcome::Success => {
                debug!(version = %out.stdout, "Container runtime available");
                Ok(true)
            }
            ProcessOutcome::NotFound => Ok(false),
            outcome @ ProcessOutcome::Failed { .. } => Err(BuildError::RuntimeProbeFailed {
                command: self.docker.version_invocation().to_string(),
                outcome,
                stderr: out.stderr,
            }),
        }
    }

    async fn install_runtime(&self) -> Result<(), BuildError> {
        let Some(install) = &self.install else {
            warn!("No install command configured");
            return Ok(());
        };

        info!(command = %install, "Installing container runtime");
        let outcome = self.runner.status(install).await?;
        if !outcome.success() {
            warn!(command = %install, %outcome, "Runtime installation did not succeed");
        }
        Ok(())
    }

    async fn pull_base_image(&self, env: &mut BuildEnvironment) {
        info!(image = %self.base_image, "Pulling base build image");

        match self.docker.pull(&self.base_image).await {
            Ok(ProcessOutcome::Success) => env.base_image_pulled = true,
            Ok(outcome) => {
                warn!(image = %self.base_image, %outcome, "Base image pull failed, continuing")
            }
            Err(e) => warn!(image = %self.base_image, error = %e, "Base image pull failed, continuing"),
        }
    }
}

#[cfg(unix)]
fn create_dir(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o755)
        .create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}
