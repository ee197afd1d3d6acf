//! Build request and build mode resolution
//!
//! A [`BuildRequest`] captures what the user asked for: a docker image, a set of
//! distributable packages, or both. It is validated once at construction and
//! never mutated afterwards. The [`BuildMode`] derived from it is the only signal
//! handed to the containerized build script.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Branch compiled when none is given on the command line
pub const DEFAULT_BRANCH: &str = "stable";

/// Errors raised while validating a build request
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// Neither a container image nor packages were requested
    #[error("Must specify a build output type: packages '-p' or docker image '-d <docker_image_name>'")]
    NoOutputType,

    /// A container image was requested with an empty name
    #[error("Docker container name must not be empty")]
    EmptyContainerName,

    /// Container name does not start with an alphabetic character
    #[error("Bad docker container name '{0}'. It must start with an alpha character")]
    InvalidContainerName(String),
}

/// Artifact types the containerized build should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Static binaries only, used to assemble a docker image
    Static,
    /// Distributable packages (rpm, deb, tar.gz)
    Packages,
    /// Static binaries and packages
    All,
}

impl BuildMode {
    /// Token passed to the build entry-point script
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Static => "static",
            BuildMode::Packages => "packages",
            BuildMode::All => "all",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes the build mode from the requested output types.
///
/// `(false, false)` cannot be reached through [`BuildRequest`], whose
/// constructor rejects it; it falls through to `Static`.
pub fn resolve(want_container: bool, want_packages: bool) -> BuildMode {
    match (want_container, want_packages) {
        (true, true) => BuildMode::All,
        (false, true) => BuildMode::Packages,
        _ => BuildMode::Static,
    }
}

/// Checks that a container image name starts with an alphabetic character
pub fn validate_container_name(name: &str) -> Result<(), RequestError> {
    match name.chars().next() {
        None => Err(RequestError::EmptyContainerName),
        Some(c) if c.is_alphabetic() => Ok(()),
        Some(_) => Err(RequestError::InvalidContainerName(name.to_string())),
    }
}

/// Validated user intent for a single build invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildRequest {
    container_name: Option<String>,
    want_packages: bool,
    source_branch: String,
}

impl BuildRequest {
    /// Creates a request, rejecting it before any side effect if it is invalid.
    ///
    /// `container_name` being `Some` means a docker image is wanted.
    pub fn new(
        container_name: Option<String>,
        want_packages: bool,
        source_branch: impl Into<String>,
    ) -> Result<Self, RequestError> {
        if container_name.is_none() && !want_packages {
            return Err(RequestError::NoOutputType);
        }

        if let Some(name) = &container_name {
            validate_container_name(name)?;
        }

        Ok(Self {
            container_name,
            want_packages,
            source_branch: source_branch.into(),
        })
    }

    pub fn want_container(&self) -> bool {
        self.container_name.is_some()
    }

    pub fn container_name(&self) -> Option<&str> {
        self.container_name.as_deref()
    }

    pub fn want_packages(&self) -> bool {
        self.want_packages
    }

    pub fn source_branch(&self) -> &str {
        &self.source_branch
    }

    pub fn mode(&self) -> BuildMode {
        resolve(self.want_container(), self.want_packages)
    }
}
