//! Glaze replay
//!
//! Applies a recorded JSON-lines redraw stream headlessly and writes the
//! resulting screen as a PPM image.

use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use glaze::bridge::{self, BridgeError};
use glaze::config::Config;
use glaze::event::GlazeEvent;
use glaze::snapshot;
use glaze_core::{BlockPainter, CellSize, RedrawInterpreter};

/// CLI arguments for glaze-replay
#[derive(Parser, Debug)]
#[command(name = "glaze-replay")]
#[command(version)]
#[command(about = "Replay a recorded redraw stream and save the screen as PPM", long_about = None)]
struct ReplayArgs {
    /// Recorded redraw stream, one batch per line
    #[arg(value_name = "LOG")]
    log: PathBuf,

    /// Output image
    #[arg(short, long, value_name = "FILE", default_value = "screen.ppm")]
    output: PathBuf,

    /// Path to custom config file (grid size and colours)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Cell width in pixels
    #[arg(long, default_value_t = 8)]
    cell_width: u32,

    /// Cell height in pixels
    #[arg(long, default_value_t = 16)]
    cell_height: u32,

    /// Leave the cursor out of the image
    #[arg(long)]
    no_cursor: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = ReplayArgs::parse();
    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let painter = BlockPainter::new(CellSize::new(args.cell_width.max(1), args.cell_height.max(1)));
    let (cols, rows) = config.dimensions;
    let mut interpreter = RedrawInterpreter::new(
        cols as u32,
        rows as u32,
        painter,
        config.foreground(),
        config.background(),
    );

    let reader = BufReader::new(File::open(&args.log)?);
    let batches = bridge::read_batches(reader, |event| {
        if let GlazeEvent::Batch(commands) = event {
            let outcome = interpreter.apply(&commands);
            log::debug!("Applied {} commands: {:?}", commands.len(), outcome);
        }
        Ok::<(), BridgeError>(())
    })?;

    let state = interpreter.state();
    let (width, height) = (state.pixel_width(), state.pixel_height());
    let mut pixels = vec![0u32; width as usize * height as usize];
    interpreter.present(&mut pixels, width, height, !args.no_cursor);

    let mut out = BufWriter::new(File::create(&args.output)?);
    snapshot::write_ppm(&mut out, &pixels, width, height)?;

    log::info!(
        "Replayed {} batches into {}x{} cells, wrote {:?}",
        batches,
        state.cols(),
        state.rows(),
        args.output
    );
    Ok(())
}
