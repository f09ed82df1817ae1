//! Glaze
//!
//! Pixel front-end for a remote screen-oriented editor. Redraw batches are
//! read from stdin as JSON lines; key presses and script input are written
//! to stdout.

use std::error::Error;
use std::fs;

use clap::Parser;
use glaze::app::App;
use glaze::config::{CliArgs, Config};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    log::debug!("Starting Glaze");

    // Parse CLI arguments
    let args = CliArgs::parse();

    // Load configuration with precedence: CLI > env > file > defaults
    let config = match Config::load_with_args(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    log::debug!(
        "Grid {}x{}, font {:?} @ {}px",
        config.dimensions.0,
        config.dimensions.1,
        config.font.path,
        config.font.size
    );

    // One script row per line; blank lines stay as blank rows
    let script = match &args.script {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Failed to read script {:?}: {}", path, e))?
            .lines()
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };

    let app = App::new(config, script)?;
    app.run()?;

    log::debug!("Glaze exited");
    Ok(())
}
