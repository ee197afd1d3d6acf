use crate::request::DEFAULT_BRANCH;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Build InfluxDB packages and/or a docker image inside a transient container
#[derive(Parser, Debug)]
#[command(
    name = "influxdb-builder",
    about = "Build InfluxDB packages and docker images inside a transient build container",
    version,
    override_usage = "influxdb-builder [-d <CONTAINER_NAME> | -p] [OPTIONS]",
    long_about = "influxdb-builder compiles InfluxDB from a git branch inside an isolated \
                  ppc64le build container. It produces distributable packages (.rpm, .deb, \
                  .tar.gz), a docker image containing the static binaries, or both.\n\n\
                  Examples:\n  \
                  influxdb-builder -p\n  \
                  influxdb-builder -d influx-ppc\n  \
                  influxdb-builder -d influx-ppc -p -b master"
)]
pub struct CliArgs {
    #[arg(
        short = 'd',
        long = "docker",
        value_name = "CONTAINER_NAME",
        help = "Build docker container with the following name"
    )]
    pub docker: Option<String>,

    #[arg(short = 'p', long, help = "Create packages (.deb, .rpm, .tar.gz)")]
    pub packages: bool,

    #[arg(
        short = 'b',
        long,
        value_name = "BRANCH",
        default_value = DEFAULT_BRANCH,
        help = "InfluxDB git branch (version) to compile (stable, beta, master, 0.13 ...)"
    )]
    pub branch: String,

    #[arg(
        long,
        value_name = "PATH",
        help = "Install root containing build_script/ and build_docker/ (defaults to INFLUXDB_BUILDER_ROOT or the current directory)"
    )]
    pub root: Option<PathBuf>,

    #[arg(long, value_name = "IMAGE", help = "Base build image providing the toolchain")]
    pub base_image: Option<String>,

    #[arg(
        long,
        value_name = "ID",
        conflicts_with = "isolated",
        help = "Run identifier separating output directory and build container name"
    )]
    pub run_id: Option<String>,

    #[arg(long, help = "Use a generated run identifier")]
    pub isolated: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Summary output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long = "loglevel",
        visible_alias = "log-level",
        value_name = "LEVEL",
        help_heading = "Debug",
        help = "Set logging level: CRITICAL, ERROR, WARNING, INFO, DEBUG (default: INFO)"
    )]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help_heading = "Debug", help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help_heading = "Debug",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
