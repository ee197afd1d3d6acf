//! Command handlers
//!
//! Each handler returns the process exit code: 0 on success, 1 on a rejected
//! request or any fatal build error.

use super::commands::CliArgs;
use super::output::OutputFormatter;
use crate::build::BuildOrchestrator;
use crate::config::BuilderConfig;
use crate::request::BuildRequest;
use crate::runtime::{CommandRunner, SystemRunner};
use std::sync::Arc;
use tracing::{debug, error};

/// Builds the request from arguments; rejected requests never reach the orchestrator
pub fn request_from_args(args: &CliArgs) -> Result<BuildRequest, crate::request::RequestError> {
    BuildRequest::new(args.docker.clone(), args.packages, args.branch.clone())
}

/// Applies command-line overrides on top of the environment configuration
pub fn config_from_args(args: &CliArgs, base: BuilderConfig) -> BuilderConfig {
    let mut config = base.with_run_id(args.run_id.clone());
    if let Some(root) = &args.root {
        config = config.with_root(root);
    }
    if let Some(image) = &args.base_image {
        config = config.with_base_image(image);
    }
    if args.isolated {
        config = config.isolated();
    }
    config
}

pub async fn handle_build(args: &CliArgs) -> i32 {
    handle_build_with(args, BuilderConfig::default(), Arc::new(SystemRunner::new())).await
}

pub async fn handle_build_with(
    args: &CliArgs,
    base: BuilderConfig,
    runner: Arc<dyn CommandRunner>,
) -> i32 {
    let request = match request_from_args(args) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Usage: influxdb-builder [-d <CONTAINER_NAME> | -p] [OPTIONS]");
            return 1;
        }
    };
    debug!(?request, "Build request");

    let config = config_from_args(args, base);
    let orchestrator = match BuildOrchestrator::new(config, runner) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.help_message());
            return 1;
        }
    };

    let report = match orchestrator.execute(&request).await {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.help_message());
            return 1;
        }
    };

    match OutputFormatter::new(args.format.into()).format(&report) {
        Ok(summary) => {
            print!("{}", summary);
            0
        }
        Err(e) => {
            error!("Failed to format build summary: {:#}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BASE_IMAGE, DEFAULT_CONTEXT_NAME, DEFAULT_INSTALL_COMMAND};
    use crate::runtime::MockRunner;
    use clap::Parser;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn base(root: PathBuf) -> BuilderConfig {
        BuilderConfig {
            root,
            base_image: DEFAULT_BASE_IMAGE.to_string(),
            runtime: "docker".to_string(),
            install_command: DEFAULT_INSTALL_COMMAND.to_string(),
            context_name: DEFAULT_CONTEXT_NAME.to_string(),
            run_id: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_config_overrides() {
        let args = CliArgs::parse_from([
            "influxdb-builder",
            "-p",
            "--root",
            "/opt/builder",
            "--base-image",
            "custom:1",
            "--run-id",
            "r7",
        ]);
        let config = config_from_args(&args, base(PathBuf::from(".")));
        assert_eq!(config.root, PathBuf::from("/opt/builder"));
        assert_eq!(config.base_image, "custom:1");
        assert_eq!(config.run_id.as_deref(), Some("r7"));
        assert_eq!(config.execution_name(), "influxdb_build-r7");
    }

    #[test]
    fn test_isolated_generates_run_id() {
        let args = CliArgs::parse_from(["influxdb-builder", "-p", "--isolated"]);
        let config = config_from_args(&args, base(PathBuf::from(".")));
        assert!(config.run_id.is_some());
    }

    #[tokio::test]
    async fn test_rejected_request_has_no_side_effects() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(MockRunner::new());
        let args = CliArgs::parse_from(["influxdb-builder", "-d", "9bad"]);

        let code = handle_build_with(&args, base(dir.path().to_path_buf()), runner.clone()).await;

        assert_eq!(code, 1);
        assert!(runner.calls().is_empty());
        assert!(!dir.path().join("build_output").exists());
    }

    #[tokio::test]
    async fn test_missing_output_type_is_rejected() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(MockRunner::new());
        let args = CliArgs::parse_from(["influxdb-builder", "-b", "master"]);

        let code = handle_build_with(&args, base(dir.path().to_path_buf()), runner.clone()).await;

        assert_eq!(code, 1);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_packages_build_succeeds() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(MockRunner::new());
        let args = CliArgs::parse_from(["influxdb-builder", "-p"]);

        let code = handle_build_with(&args, base(dir.path().to_path_buf()), runner.clone()).await;

        assert_eq!(code, 0);
        assert_eq!(runner.count("docker", "run"), 1);
    }

    #[tokio::test]
    async fn test_invalid_root_fails() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(MockRunner::new());
        let args = CliArgs::parse_from(["influxdb-builder", "-p"]);

        let code =
            handle_build_with(&args, base(dir.path().join("missing")), runner.clone()).await;

        assert_eq!(code, 1);
        assert!(runner.calls().is_empty());
    }
}
