//! Progress handler trait and events

use std::fmt;
use std::time::Duration;

/// Sequential steps of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    PrepareEnvironment,
    ContainerBuild,
    Packaging,
    Reporting,
}

impl BuildPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildPhase::PrepareEnvironment => "prepare-environment",
            BuildPhase::ContainerBuild => "container-build",
            BuildPhase::Packaging => "packaging",
            BuildPhase::Reporting => "reporting",
        }
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted during a build
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Build started
    Started { mode: String, branch: String },

    /// Phase started
    PhaseStarted { phase: BuildPhase },

    /// Phase finished successfully
    PhaseComplete { phase: BuildPhase, duration: Duration },

    /// Phase skipped because its output was not requested
    PhaseSkipped { phase: BuildPhase },

    /// Build completed successfully
    Completed { total_time: Duration },

    /// Build failed
    Failed { phase: BuildPhase, error: String },
}

/// Trait for handling progress events during a build
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
