//! Build orchestration
//!
//! The workflow is strictly sequential:
//!
//! 1. [`EnvironmentPreparer`] creates the output directory, makes sure a
//!    container runtime is usable and pulls the toolchain image
//! 2. The [`BuildMode`](crate::request::BuildMode) is resolved from the request
//! 3. [`ContainerizedBuilder`] compiles inside a transient container
//! 4. [`ArtifactPackager`] turns the static binaries into an image (only when an
//!    image was requested)
//! 5. Produced packages and images are collected into a [`BuildReport`]
//!
//! # Example
//!
//! ```no_run
//! use influxdb_builder::{BuildOrchestrator, BuildRequest, BuilderConfig, SystemRunner};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = BuildRequest::new(Some("influx-ppc".to_string()), true, "stable")?;
//! let orchestrator = BuildOrchestrator::new(BuilderConfig::default(), Arc::new(SystemRunner::new()))?;
//! let report = orchestrator.execute(&request).await?;
//! println!("{:?}", report.image);
//! # Ok(())
//! # }
//! ```

mod builder;
mod environment;
mod error;
mod layout;
mod orchestrator;
mod packager;
mod report;

pub use builder::ContainerizedBuilder;
pub use environment::{BuildEnvironment, EnvironmentPreparer};
pub use error::BuildError;
pub use layout::{BuildLayout, ARCHIVE_NAME, CONTEXT_DIR, OUTPUT_DIR, SCRIPT_DIR};
pub use orchestrator::BuildOrchestrator;
pub use packager::{ArtifactPackager, ArtifactSet, PackagedImage, INFLUXDB_BINARIES};
pub use report::{collect_packages, BuildReport, ImageReport, PackageGroup, PACKAGE_KINDS};
