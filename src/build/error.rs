use crate::config::ConfigError;
use crate::runtime::{ProcessOutcome, RunnerError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a build
#[derive(Debug, Error)]
pub enum BuildError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Output directory could not be created
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Runtime missing and installing it did not help
    #[error("Container runtime '{runtime}' is not available")]
    RuntimeUnavailable { runtime: String },

    /// Runtime binary exists but the version probe failed
    #[error("Container runtime probe '{command}' failed ({outcome})")]
    RuntimeProbeFailed {
        command: String,
        outcome: ProcessOutcome,
        stderr: String,
    },

    /// Build environment did not reach a usable state
    #[error("Build environment not ready: {0}")]
    EnvironmentNotReady(String),

    /// Containerized build exited unsuccessfully
    #[error("Containerized build failed ({outcome})")]
    BuildFailed { outcome: ProcessOutcome },

    /// Expected build artifact is absent from the output directory
    #[error("Expected artifact '{name}' not found in {dir}")]
    ArtifactMissing { name: String, dir: PathBuf },

    /// Archive could not be written or a stale one removed
    #[error("Failed to write archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image build exited unsuccessfully
    #[error("Image build for '{tag}' failed ({outcome})")]
    ImageBuildFailed { tag: String, outcome: ProcessOutcome },

    /// Output directory could not be listed for the report
    #[error("Failed to list packages in {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External process could not be started
    #[error(transparent)]
    Runner(#[from] RunnerError),
}

impl BuildError {
    /// Returns a user-friendly error message with troubleshooting hints
    pub fn help_message(&self) -> String {
        match self {
            BuildError::RuntimeUnavailable { runtime } => format!(
                "Error: container runtime '{}' is not available\n\n\
                Help: Automatic installation did not make it usable. Try:\n\
                - Install it manually (e.g. sudo apt-get install -y docker.io)\n\
                - Check that '{}' is on your PATH\n\
                - Set INFLUXDB_BUILDER_RUNTIME to another docker-compatible CLI",
                runtime, runtime
            ),
            BuildError::RuntimeProbeFailed {
                command, stderr, ..
            } => format!(
                "Error: '{}' failed\n\n\
                Help: The runtime is installed but not working. Check:\n\
                - Is the daemon running?\n\
                - Does your user have permission to use it?\n\n\
                Details: {}",
                command, stderr
            ),
            BuildError::BuildFailed { outcome } => format!(
                "Error: the containerized build failed ({})\n\n\
                Help: Review the build output above. The selected branch may not\n\
                exist or the build script may have failed.",
                outcome
            ),
            BuildError::ArtifactMissing { name, dir } => format!(
                "Error: expected binary '{}' was not produced in {}\n\n\
                Help: The containerized build did not complete successfully.\n\
                Review the build output above for the failing step.",
                name,
                dir.display()
            ),
            BuildError::ImageBuildFailed { tag, .. } => format!(
                "Error: building image '{}' failed\n\n\
                Help: Check the container build descriptor in build_docker/.",
                tag
            ),
            other => format!("Error: {}", other),
        }
    }
}
