//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::Result;
use std::io::Write;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config) -> Result<()> {
    let mut stdout = std::io::stdout();
    match args.action {
        ConfigAction::Show => write!(stdout, "{}", config.to_yaml()?)?,
        ConfigAction::Path => {
            for path in Config::default_config_paths() {
                let marker = if path.exists() { "*" } else { " " };
                writeln!(stdout, "{} {}", marker, path.display())?;
            }
        }
    }
    stdout.flush()?;
    Ok(())
}
