use super::builder::ContainerizedBuilder;
use super::environment::EnvironmentPreparer;
use super::layout::BuildLayout;
use super::packager::{ArtifactPackager, ArtifactSet};
use super::report::{collect_packages, BuildReport, ImageReport};
use super::BuildError;
use crate::config::BuilderConfig;
use crate::progress::{BuildPhase, LoggingHandler, ProgressEvent, ProgressHandler};
use crate::request::BuildRequest;
use crate::runtime::{CommandRunner, DockerCli};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs the build phases in order: environment, containerized build,
/// optional image packaging, report collection. Any failure stops the run.
pub struct BuildOrchestrator {
    config: BuilderConfig,
    layout: BuildLayout,
    docker: DockerCli,
    preparer: EnvironmentPreparer,
    builder: ContainerizedBuilder,
    packager: ArtifactPackager,
    progress: Arc<dyn ProgressHandler>,
}

impl BuildOrchestrator {
    pub fn new(config: BuilderConfig, runner: Arc<dyn CommandRunner>) -> Result<Self, BuildError> {
        config.validate()?;
        let layout = BuildLayout::from_config(&config)?;
        let docker = DockerCli::new(config.runtime.clone(), runner.clone());

        let preparer = EnvironmentPreparer::new(
            docker.clone(),
            runner,
            &config.install_command,
            config.base_image.clone(),
            layout.output_dir(),
        );
        let builder = ContainerizedBuilder::new(
            docker.clone(),
            config.base_image.clone(),
            config.execution_name(),
            layout.clone(),
        );
        let packager = ArtifactPackager::new(
            docker.clone(),
            ArtifactSet::default(),
            layout.output_dir(),
            layout.context_dir(),
            layout.archive_path(),
        );

        Ok(Self {
            config,
            layout,
            docker,
            preparer,
            builder,
            packager,
            progress: Arc::new(LoggingHandler),
        })
    }

    pub fn with_progress(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress = handler;
        self
    }

    pub fn layout(&self) -> &BuildLayout {
        &self.layout
    }

    pub async fn execute(&self, request: &BuildRequest) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let mode = request.mode();
        debug!(%mode, "Resolved build mode");

        self.progress.on_progress(&ProgressEvent::Started {
            mode: mode.to_string(),
            branch: request.source_branch().to_string(),
        });

        let environment = self
            .phase(BuildPhase::PrepareEnvironment, async {
                let env = self.preparer.prepare().await?;
                if !env.is_ready() {
                    return Err(BuildError::EnvironmentNotReady(format!("{:?}", env)));
                }
                Ok(env)
            })
            .await?;

        self.phase(
            BuildPhase::ContainerBuild,
            self.builder.run(mode, request.source_branch()),
        )
        .await?;

        let image = match request.container_name() {
            Some(name) => Some(self.phase(BuildPhase::Packaging, self.package(name)).await?),
            None => {
                self.progress.on_progress(&ProgressEvent::PhaseSkipped {
                    phase: BuildPhase::Packaging,
                });
                None
            }
        };

        let packages = self
            .phase(BuildPhase::Reporting, async {
                if !request.want_packages() {
                    return Ok(Vec::new());
                }
                collect_packages(self.layout.output_dir()).map_err(|source| BuildError::Report {
                    path: self.layout.output_dir().to_path_buf(),
                    source,
                })
            })
            .await?;

        self.progress.on_progress(&ProgressEvent::Completed {
            total_time: start.elapsed(),
        });

        Ok(BuildReport {
            mode,
            branch: request.source_branch().to_string(),
            run_id: self.config.run_id.clone(),
            output_dir: self.layout.output_dir().to_path_buf(),
            environment,
            image,
            packages,
        })
    }

    async fn package(&self, name: &str) -> Result<ImageReport, BuildError> {
        let image = self.packager.package(name).await?;

        let listing = match self.docker.images(name).await {
            Ok(out) if out.outcome.success() => Some(out.stdout),
            Ok(out) => {
                warn!(image = name, outcome = %out.outcome, stderr = %out.stderr, "Image listing failed");
                None
            }
            Err(e) => {
                warn!(image = name, error = %e, "Image listing failed");
                None
            }
        };

        Ok(ImageReport { image, listing })
    }

    async fn phase<T, F>(&self, phase: BuildPhase, work: F) -> Result<T, BuildError>
    where
        F: Future<Output = Result<T, BuildError>>,
    {
        self.progress
            .on_progress(&ProgressEvent::PhaseStarted { phase });
        let started = Instant::now();

        match work.await {
            Ok(value) => {
                self.progress.on_progress(&ProgressEvent::PhaseComplete {
                    phase,
                    duration: started.elapsed(),
                });
                Ok(value)
            }
            Err(e) => {
                self.progress.on_progress(&ProgressEvent::Failed {
                    phase,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BASE_IMAGE, DEFAULT_CONTEXT_NAME, DEFAULT_INSTALL_COMMAND};
    use crate::runtime::{MockRunner, ProcessOutcome};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingHandler {
        events: Mutex<Vec<String>>,
    }

    impl ProgressHandler for RecordingHandler {
        fn on_progress(&self, event: &ProgressEvent) {
            let line = match event {
                ProgressEvent::Started { mode, .. } => format!("started:{}", mode),
                ProgressEvent::PhaseStarted { phase } => format!("start:{}", phase),
                ProgressEvent::PhaseComplete { phase, .. } => format!("done:{}", phase),
                ProgressEvent::PhaseSkipped { phase } => format!("skip:{}", phase),
                ProgressEvent::Completed { .. } => "completed".to_string(),
                ProgressEvent::Failed { phase, .. } => format!("failed:{}", phase),
            };
            self.events.lock().unwrap().push(line);
        }
    }

    fn config(dir: &TempDir) -> BuilderConfig {
        BuilderConfig {
            root: dir.path().to_path_buf(),
            base_image: DEFAULT_BASE_IMAGE.to_string(),
            runtime: "docker".to_string(),
            install_command: DEFAULT_INSTALL_COMMAND.to_string(),
            context_name: DEFAULT_CONTEXT_NAME.to_string(),
            run_id: None,
            log_level: "info".to_string(),
        }
    }

    #[tokio::test]
    async fn test_packages_build_emits_phases_in_order() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(MockRunner::new());
        let handler = Arc::new(RecordingHandler::default());
        let orchestrator = BuildOrchestrator::new(config(&dir), runner.clone())
            .unwrap()
            .with_progress(handler.clone());

        let request = BuildRequest::new(None, true, "stable").unwrap();
        orchestrator.execute(&request).await.unwrap();

        assert_eq!(
            *handler.events.lock().unwrap(),
            vec![
                "started:packages",
                "start:prepare-environment",
                "done:prepare-environment",
                "start:container-build",
                "done:container-build",
                "skip:packaging",
                "start:reporting",
                "done:reporting",
                "completed",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_build_stops_before_packaging() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(MockRunner::new());
        runner.respond("docker", Some("run"), ProcessOutcome::Failed { code: Some(1) });
        let handler = Arc::new(RecordingHandler::default());
        let orchestrator = BuildOrchestrator::new(config(&dir), runner.clone())
            .unwrap()
            .with_progress(handler.clone());

        let request = BuildRequest::new(Some("influx".to_string()), false, "stable").unwrap();
        let err = orchestrator.execute(&request).await.unwrap_err();

        assert!(matches!(err, BuildError::BuildFailed { .. }));
        assert_eq!(runner.count("docker", "build"), 0);
        assert_eq!(
            handler.events.lock().unwrap().last().map(String::as_str),
            Some("failed:container-build")
        );
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(&dir);
        cfg.runtime = String::new();
        let runner = Arc::new(MockRunner::new());

        assert!(matches!(
            BuildOrchestrator::new(cfg, runner.clone()),
            Err(BuildError::Config(_))
        ));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_image_listing_failure_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("build_output");
        std::fs::create_dir_all(&output).unwrap();
        std::fs::create_dir_all(dir.path().join("build_docker")).unwrap();
        for name in crate::build::INFLUXDB_BINARIES {
            std::fs::write(output.join(name), "bin").unwrap();
        }

        let runner = Arc::new(MockRunner::new());
        runner.respond("docker", Some("images"), ProcessOutcome::Failed { code: Some(1) });
        let orchestrator = BuildOrchestrator::new(config(&dir), runner.clone())
            .unwrap()
            .with_progress(Arc::new(crate::progress::NoOpHandler));

        let request = BuildRequest::new(Some("influx".to_string()), false, "stable").unwrap();
        let report = orchestrator.execute(&request).await.unwrap();

        let image = report.image.unwrap();
        assert_eq!(image.image.tag, "influx");
        assert!(image.listing.is_none());
    }
}
