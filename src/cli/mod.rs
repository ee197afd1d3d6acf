pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, OutputFormatArg};
pub use handlers::{config_from_args, handle_build, handle_build_with, request_from_args};
pub use output::{OutputFormat, OutputFormatter};
