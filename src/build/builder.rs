//! Containerized compilation step

use super::layout::{BuildLayout, CONTAINER_OUTPUT_DIR, CONTAINER_SCRIPT_DIR, ENTRY_POINT};
use super::BuildError;
use crate::request::BuildMode;
use crate::runtime::{DockerCli, RunSpec, VolumeMount};
use tracing::{debug, info};

/// Runs the build entry point inside an auto-removed container.
///
/// The script directory is mounted read-only and the output directory
/// read-write; the build mode and branch are passed as positional arguments.
pub struct ContainerizedBuilder {
    docker: DockerCli,
    base_image: String,
    execution_name: String,
    layout: BuildLayout,
}

impl ContainerizedBuilder {
    pub fn new(
        docker: DockerCli,
        base_image: impl Into<String>,
        execution_name: impl Into<String>,
        layout: BuildLayout,
    ) -> Self {
        Self {
            docker,
            base_image: base_image.into(),
            execution_name: execution_name.into(),
            layout,
        }
    }

    pub fn spec(&self, mode: BuildMode, branch: &str) -> RunSpec {
        RunSpec {
            name: self.execution_name.clone(),
            image: self.base_image.clone(),
            volumes: vec![
                VolumeMount {
                    host_path: self.layout.script_dir().to_path_buf(),
                    container_path: CONTAINER_SCRIPT_DIR.to_string(),
                    read_only: true,
                },
                VolumeMount {
                    host_path: self.layout.output_dir().to_path_buf(),
                    container_path: CONTAINER_OUTPUT_DIR.to_string(),
                    read_only: false,
                },
            ],
            command: vec![
                ENTRY_POINT.to_string(),
                mode.as_str().to_string(),
                branch.to_string(),
            ],
        }
    }

    /// Blocks until the build container exits; a non-zero exit is an error
    pub async fn run(&self, mode: BuildMode, branch: &str) -> Result<(), BuildError> {
        let spec = self.spec(mode, branch);
        info!(%mode, branch, container = %spec.name, "Starting build in transient container");
        debug!(command = %self.docker.run_invocation(&spec), "Build command");

        let outcome = self.docker.run(&spec).await?;
        if !outcome.success() {
            return Err(BuildError::BuildFailed { outcome });
        }

        debug!("Containerized build finished");
        Ok(())
    }
}
