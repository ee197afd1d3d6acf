//! Repackaging static binaries into a docker image
//!
//! The binaries produced by a static build are bundled into a gzip-compressed
//! tarball inside the image build context, then the image is built from that
//! context. The tarball is recreated on every run so a previous build can never
//! leak into a new image. A missing binary aborts packaging: this is where an
//! incomplete upstream build becomes visible.

use super::BuildError;
use crate::runtime::DockerCli;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Executables a static build leaves in the output directory
pub const INFLUXDB_BINARIES: [&str; 5] = [
    "influx",
    "influxd",
    "influx_inspect",
    "influx_stress",
    "influx_tsm",
];

/// Ordered list of file names bundled into the image archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSet {
    names: Vec<String>,
}

impl ArtifactSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Default for ArtifactSet {
    fn default() -> Self {
        Self::new(INFLUXDB_BINARIES)
    }
}

/// Image produced from the archived artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagedImage {
    pub tag: String,
    pub archive: PathBuf,
    pub artifacts: Vec<String>,
}

pub struct ArtifactPackager {
    docker: DockerCli,
    artifacts: ArtifactSet,
    output_dir: PathBuf,
    context_dir: PathBuf,
    archive_path: PathBuf,
}

impl ArtifactPackager {
    pub fn new(
        docker: DockerCli,
        artifacts: ArtifactSet,
        output_dir: impl Into<PathBuf>,
        context_dir: impl Into<PathBuf>,
        archive_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            docker,
            artifacts,
            output_dir: output_dir.into(),
            context_dir: context_dir.into(),
            archive_path: archive_path.into(),
        }
    }

    /// Archives the artifact set and builds an image tagged `container_name`
    pub async fn package(&self, container_name: &str) -> Result<PackagedImage, BuildError> {
        self.remove_stale_archive()?;
        self.create_archive()?;

        info!(tag = container_name, "Building influxdb docker container");
        let outcome = self.docker.build(container_name, &self.context_dir).await?;
        if !outcome.success() {
            return Err(BuildError::ImageBuildFailed {
                tag: container_name.to_string(),
                outcome,
            });
        }

        Ok(PackagedImage {
            tag: container_name.to_string(),
            archive: self.archive_path.clone(),
            artifacts: self.artifacts.names().to_vec(),
        })
    }

    fn remove_stale_archive(&self) -> Result<(), BuildError> {
        match fs::remove_file(&self.archive_path) {
            Ok(()) => {
                debug!(path = %self.archive_path.display(), "Removed previous archive");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(BuildError::Archive {
                path: self.archive_path.clone(),
                source,
            }),
        }
    }

    /// Writes the archive, leaving nothing behind if any artifact is missing
    pub fn create_archive(&self) -> Result<(), BuildError> {
        for name in self.artifacts.names() {
            if !self.output_dir.join(name).is_file() {
                return Err(BuildError::ArtifactMissing {
                    name: name.clone(),
                    dir: self.output_dir.clone(),
                });
            }
        }

        info!(
            path = %self.archive_path.display(),
            count = self.artifacts.names().len(),
            "Creating archive of influxdb binaries"
        );

        if let Err(source) = self.write_archive() {
            if let Err(e) = fs::remove_file(&self.archive_path) {
                if e.kind() != ErrorKind::NotFound {
                    warn!(path = %self.archive_path.display(), error = %e, "Failed to remove partial archive");
                }
            }
            return Err(BuildError::Archive {
                path: self.archive_path.clone(),
                source,
            });
        }

        Ok(())
    }

    fn write_archive(&self) -> io::Result<()> {
        let file = File::create(&self.archive_path)?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for name in self.artifacts.names() {
            builder.append_path_with_name(self.output_dir.join(name), name)?;
        }

        builder.into_inner()?.finish()?.sync_all()
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }
}
