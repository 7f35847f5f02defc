use ideaforge::cli::commands::{CliArgs, Commands};
use ideaforge::cli::handlers::{handle_serve, handle_validate};
use ideaforge::util::logging::{init_logging, parse_level, LoggingConfig};
use ideaforge::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging(logging_config(&args));

    debug!("ideaforge v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Serve(serve_args) => handle_serve(serve_args).await,
        Commands::Validate(validate_args) => handle_validate(validate_args).await,
    };

    std::process::exit(exit_code);
}

/// CLI flags win over `IDEAFORGE_LOG_LEVEL`
fn logging_config(args: &CliArgs) -> LoggingConfig {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        match parse_level(level_str) {
            Some(level) => config.level = level,
            None => eprintln!(
                "Invalid log level '{}', using {}. Valid levels: trace, debug, info, warn, error",
                level_str, config.level
            ),
        }
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    config
}
