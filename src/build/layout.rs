//! Filesystem layout of an install root

use crate::config::{BuilderConfig, ConfigError};
use std::path::{Path, PathBuf};

pub const OUTPUT_DIR: &str = "build_output";
pub const SCRIPT_DIR: &str = "build_script";
pub const CONTEXT_DIR: &str = "build_docker";
/// Archive name referenced by the container build descriptor in `build_docker/`
pub const ARCHIVE_NAME: &str = "influxdb-static_ppc64le.tar.gz";

pub const CONTAINER_SCRIPT_DIR: &str = "/build_script";
pub const CONTAINER_OUTPUT_DIR: &str = "/build_output";
pub const ENTRY_POINT: &str = "/build_script/build_influxdb.sh";

/// Absolute host paths used by one build invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    root: PathBuf,
    output_dir: PathBuf,
    script_dir: PathBuf,
    context_dir: PathBuf,
}

impl BuildLayout {
    /// `root` must be absolute. A run id moves the output into its own subdirectory.
    pub fn new(root: impl Into<PathBuf>, run_id: Option<&str>) -> Self {
        let root = root.into();
        let mut output_dir = root.join(OUTPUT_DIR);
        if let Some(id) = run_id {
            output_dir.push(id);
        }

        Self {
            script_dir: root.join(SCRIPT_DIR),
            context_dir: root.join(CONTEXT_DIR),
            output_dir,
            root,
        }
    }

    pub fn from_config(config: &BuilderConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.absolute_root()?, config.run_id.as_deref()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn script_dir(&self) -> &Path {
        &self.script_dir
    }

    pub fn context_dir(&self) -> &Path {
        &self.context_dir
    }

    pub fn archive_path(&self) -> PathBuf {
        self.context_dir.join(ARCHIVE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = BuildLayout::new("/opt/builder", None);
        assert_eq!(layout.root(), Path::new("/opt/builder"));
        assert_eq!(layout.output_dir(), Path::new("/opt/builder/build_output"));
        assert_eq!(layout.script_dir(), Path::new("/opt/builder/build_script"));
        assert_eq!(layout.context_dir(), Path::new("/opt/builder/build_docker"));
        assert_eq!(
            layout.archive_path(),
            PathBuf::from("/opt/builder/build_docker/influxdb-static_ppc64le.tar.gz")
        );
    }

    #[test]
    fn test_run_id_scopes_output_only() {
        let layout = BuildLayout::new("/opt/builder", Some("r1"));
        assert_eq!(layout.output_dir(), Path::new("/opt/builder/build_output/r1"));
        assert_eq!(layout.script_dir(), Path::new("/opt/builder/build_script"));
        assert_eq!(
            layout.archive_path(),
            PathBuf::from("/opt/builder/build_docker/influxdb-static_ppc64le.tar.gz")
        );
    }
}
