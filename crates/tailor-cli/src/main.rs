//! Tailor CLI - render JSON documents through include/exclude policies
//!
//! This is the main entry point for the `tailor` binary. It loads the
//! configuration, sets up logging and dispatches to the command handlers.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::LoggingConfig;
use std::process;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    // Handle the result
    match run(cli) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!(
                "{}",
                error::format_error(&e, control::SHOULD_COLORIZE.should_colorize())
            );
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
fn run(cli: Cli) -> Result<()> {
    // Load configuration before logging so the file can set the level
    let config = Config::load_with_file(cli.config.as_deref())?;
    config.validate()?;

    let verbosity = cli.verbosity_level();
    let mut logging = LoggingConfig::from_verbosity(verbosity);
    logging.merge_with_file(verbosity, &config.logging);
    logging.merge_with_env();
    if let Err(e) = logging::init_logging(logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    tracing::info!(command = ?cli.command, verbosity, "Executing command");

    match cli.command {
        Commands::Render(args) => handlers::handle_render(args, &config),
        Commands::Config(args) => handlers::handle_config(args, &config),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}
