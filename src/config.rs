//! Configuration management for influxdb-builder
//!
//! Settings are loaded from environment variables with sensible defaults and can
//! be overridden from the command line. Every resource name the build touches
//! (install root, base image, execution-context name) lives here rather than
//! being hardcoded, so repeated or concurrent invocations can be kept apart.
//!
//! # Environment Variables
//!
//! - `INFLUXDB_BUILDER_ROOT`: Install root containing `build_script/` and
//!   `build_docker/` - default: current directory
//! - `INFLUXDB_BUILDER_BASE_IMAGE`: Toolchain image - default:
//!   "docker.io/schabrolles/ubuntu_ppc64le:latest"
//! - `INFLUXDB_BUILDER_RUNTIME`: Container runtime binary - default: "docker"
//! - `INFLUXDB_BUILDER_INSTALL_COMMAND`: Command installing the runtime when it
//!   is missing - default: "sudo apt-get install -y docker.io"
//! - `INFLUXDB_BUILDER_CONTEXT_NAME`: Name of the transient build container -
//!   default: "influxdb_build"
//! - `INFLUXDB_BUILDER_RUN_ID`: Optional run identifier
//! - `INFLUXDB_BUILDER_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use influxdb_builder::BuilderConfig;
//!
//! let config = BuilderConfig::default().with_run_id(Some("nightly".to_string()));
//! config.validate().expect("Invalid configuration");
//! ```

use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BASE_IMAGE: &str = "docker.io/schabrolles/ubuntu_ppc64le:latest";
pub const DEFAULT_RUNTIME: &str = "docker";
pub const DEFAULT_INSTALL_COMMAND: &str = "sudo apt-get install -y docker.io";
pub const DEFAULT_CONTEXT_NAME: &str = "influxdb_build";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Install root is missing or not a directory
    #[error("Install root not found: {0}")]
    RootNotFound(PathBuf),

    /// Current directory could not be determined
    #[error("Failed to determine current directory: {0}")]
    CurrentDir(#[from] std::io::Error),
}

/// Main configuration structure for the builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Install root; relative values are resolved against the current directory
    pub root: PathBuf,

    /// Base image providing the compilation toolchain
    pub base_image: String,

    /// Container runtime binary
    pub runtime: String,

    /// Package-manager command used when the runtime is not installed
    pub install_command: String,

    /// Base name of the transient build container
    pub context_name: String,

    /// Per-invocation identifier separating output directories and container names
    pub run_id: Option<String>,

    /// Logging level name; unknown names fall back to info when logging starts
    pub log_level: String,
}

impl Default for BuilderConfig {
    /// Loads configuration from `INFLUXDB_BUILDER_*` variables with defaults
    fn default() -> Self {
        let root = env::var("INFLUXDB_BUILDER_ROOT")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let base_image = env::var("INFLUXDB_BUILDER_BASE_IMAGE")
            .unwrap_or_else(|_| DEFAULT_BASE_IMAGE.to_string());

        let runtime =
            env::var("INFLUXDB_BUILDER_RUNTIME").unwrap_or_else(|_| DEFAULT_RUNTIME.to_string());

        let install_command = env::var("INFLUXDB_BUILDER_INSTALL_COMMAND")
            .unwrap_or_else(|_| DEFAULT_INSTALL_COMMAND.to_string());

        let context_name = env::var("INFLUXDB_BUILDER_CONTEXT_NAME")
            .unwrap_or_else(|_| DEFAULT_CONTEXT_NAME.to_string());

        let run_id = env::var("INFLUXDB_BUILDER_RUN_ID")
            .ok()
            .filter(|v| !v.is_empty());

        let log_level = env::var("INFLUXDB_BUILDER_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            root,
            base_image,
            runtime,
            install_command,
            context_name,
            run_id,
            log_level,
        }
    }
}

impl BuilderConfig {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_base_image(mut self, image: impl Into<String>) -> Self {
        self.base_image = image.into();
        self
    }

    /// Replaces the run identifier; `None` keeps the configured one
    pub fn with_run_id(mut self, run_id: Option<String>) -> Self {
        if run_id.is_some() {
            self.run_id = run_id;
        }
        self
    }

    /// Assigns a freshly generated run identifier
    pub fn isolated(mut self) -> Self {
        self.run_id = Some(uuid::Uuid::new_v4().simple().to_string());
        self
    }

    /// Name of the transient build container for this run
    pub fn execution_name(&self) -> String {
        match &self.run_id {
            Some(id) => format!("{}-{}", self.context_name, id),
            None => self.context_name.clone(),
        }
    }

    /// Install root as an absolute path
    pub fn absolute_root(&self) -> Result<PathBuf, ConfigError> {
        if self.root.is_absolute() {
            Ok(self.root.clone())
        } else {
            Ok(env::current_dir()?.join(&self.root))
        }
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for empty names, a malformed run id, or a missing
    /// install root.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("runtime", &self.runtime),
            ("base image", &self.base_image),
            ("install command", &self.install_command),
            ("context name", &self.context_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }

        if let Some(run_id) = &self.run_id {
            let valid = !run_id.is_empty()
                && run_id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
            if !valid {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid run id '{}'. Allowed characters: letters, digits, '_', '.', '-'",
                    run_id
                )));
            }
        }

        let root = self.absolute_root()?;
        if !root.is_dir() {
            return Err(ConfigError::RootNotFound(root));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const VARS: [&str; 7] = [
        "INFLUXDB_BUILDER_ROOT",
        "INFLUXDB_BUILDER_BASE_IMAGE",
        "INFLUXDB_BUILDER_RUNTIME",
        "INFLUXDB_BUILDER_INSTALL_COMMAND",
        "INFLUXDB_BUILDER_CONTEXT_NAME",
        "INFLUXDB_BUILDER_RUN_ID",
        "INFLUXDB_BUILDER_LOG_LEVEL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn config_in(dir: &TempDir) -> BuilderConfig {
        BuilderConfig {
            root: dir.path().to_path_buf(),
            base_image: DEFAULT_BASE_IMAGE.to_string(),
            runtime: DEFAULT_RUNTIME.to_string(),
            install_command: DEFAULT_INSTALL_COMMAND.to_string(),
            context_name: DEFAULT_CONTEXT_NAME.to_string(),
            run_id: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_config() {
        clear_env();
        let config = BuilderConfig::default();
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.base_image, DEFAULT_BASE_IMAGE);
        assert_eq!(config.runtime, "docker");
        assert_eq!(config.install_command, DEFAULT_INSTALL_COMMAND);
        assert_eq!(config.context_name, "influxdb_build");
        assert!(config.run_id.is_none());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        clear_env();
        env::set_var("INFLUXDB_BUILDER_ROOT", "/opt/builder");
        env::set_var("INFLUXDB_BUILDER_RUNTIME", "podman");
        env::set_var("INFLUXDB_BUILDER_RUN_ID", "r42");
        env::set_var("INFLUXDB_BUILDER_LOG_LEVEL", "DEBUG");

        let config = BuilderConfig::default();
        assert_eq!(config.root, PathBuf::from("/opt/builder"));
        assert_eq!(config.runtime, "podman");
        assert_eq!(config.run_id.as_deref(), Some("r42"));
        assert_eq!(config.log_level, "debug");

        clear_env();
    }

    #[test]
    fn test_execution_name() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        assert_eq!(config.execution_name(), "influxdb_build");

        let config = config.with_run_id(Some("r1".to_string()));
        assert_eq!(config.execution_name(), "influxdb_build-r1");
    }

    #[test]
    fn test_with_run_id_none_keeps_existing() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir)
            .with_run_id(Some("keep".to_string()))
            .with_run_id(None);
        assert_eq!(config.run_id.as_deref(), Some("keep"));
    }

    #[test]
    fn test_isolated_generates_distinct_ids() {
        let dir = TempDir::new().unwrap();
        let a = config_in(&dir).isolated();
        let b = config_in(&dir).isolated();
        assert!(a.run_id.is_some());
        assert_ne!(a.run_id, b.run_id);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_validate_ok() {
        let dir = TempDir::new().unwrap();
        assert!(config_in(&dir).validate().is_ok());
    }

    #[test]
    fn test_validate_empty_runtime() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.runtime = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(msg)) if msg.contains("runtime")
        ));
    }

    #[test]
    fn test_validate_bad_run_id() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).with_run_id(Some("../escape".to_string()));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_validate_missing_root() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).with_root(dir.path().join("missing"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RootNotFound(_))
        ));
    }

    #[test]
    fn test_absolute_root_resolves_relative() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).with_root("relative/root");
        let root = config.absolute_root().unwrap();
        assert!(root.is_absolute());
        assert!(root.ends_with("relative/root"));
    }
}
