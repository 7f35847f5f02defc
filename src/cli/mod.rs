pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ServeArgs, ValidateArgs};
pub use output::{OutputFormat, OutputFormatter};
