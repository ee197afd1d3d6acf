//! influxdb-builder - containerized build orchestration for InfluxDB
//!
//! This library drives a containerized compilation of InfluxDB from a chosen git
//! branch and produces distributable packages, a docker image holding the static
//! binaries, or both.
//!
//! # Core Concepts
//!
//! - **Build request**: validated user intent (image name, packages, branch)
//! - **Build mode**: `static`, `packages` or `all`, the single signal passed to
//!   the build script running inside the container
//! - **Command runner**: the seam through which every external process runs,
//!   reporting success, failure with an exit code, or a missing program
//!
//! # Project Structure
//!
//! - [`request`]: build request validation and build mode resolution
//! - [`build`]: environment preparation, containerized build, image packaging
//! - [`runtime`]: process execution and the docker CLI client
//! - [`config`]: environment-driven configuration
//! - [`cli`]: argument parsing, handlers, and summary formatting

pub mod build;
pub mod cli;
pub mod config;
pub mod progress;
pub mod request;
pub mod runtime;
pub mod util;

pub use build::{BuildError, BuildOrchestrator, BuildReport};
pub use config::{BuilderConfig, ConfigError};
pub use request::{resolve, BuildMode, BuildRequest, RequestError};
pub use runtime::{CommandRunner, DockerCli, MockRunner, ProcessOutcome, SystemRunner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
