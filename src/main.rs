use influxdb_builder::cli::{handle_build, CliArgs};
use influxdb_builder::util::{init_logging, parse_level, LoggingConfig};
use influxdb_builder::{BuilderConfig, VERSION};

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::from_env(level_from_args(&args)));

    debug!("influxdb-builder v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = handle_build(&args).await;

    std::process::exit(exit_code);
}

fn level_from_args(args: &CliArgs) -> Level {
    if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&BuilderConfig::default().log_level)
    }
}
