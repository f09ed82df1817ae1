//! Editor bridge
//!
//! Redraw batches arrive on stdin as JSON lines and are decoded on a reader
//! thread, then handed to the UI thread as `GlazeEvent`s. Encoded inputs go
//! out on stdout, one JSON string per line.

use std::io::{self, BufRead, Write};
use std::thread::{self, JoinHandle};

use glaze_input::EncodedInput;
use glaze_protocol::{decode_batch, json};
use thiserror::Error;
use winit::event_loop::EventLoopProxy;

use crate::event::GlazeEvent;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Event loop closed")]
    EventLoopClosed,
}

/// Read batches until end of input
///
/// Lines that do not parse are logged and skipped. Empty batches are not
/// delivered. `EditorClosed` is delivered last. Returns the number of
/// batches delivered.
pub fn read_batches<R, F>(reader: R, mut deliver: F) -> Result<usize, BridgeError>
where
    R: BufRead,
    F: FnMut(GlazeEvent) -> Result<(), BridgeError>,
{
    let mut delivered = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let calls = match json::parse_batch_line(&line) {
            Ok(calls) => calls,
            Err(e) => {
                log::warn!("Skipping batch on line {}: {}", index + 1, e);
                continue;
            }
        };
        let commands = decode_batch(&calls);
        if commands.is_empty() {
            continue;
        }
        deliver(GlazeEvent::Batch(commands))?;
        delivered += 1;
    }
    deliver(GlazeEvent::EditorClosed)?;
    Ok(delivered)
}

/// Start the stdin reader thread
pub fn spawn_stdin_reader(proxy: EventLoopProxy<GlazeEvent>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("editor-reader".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            let result = read_batches(stdin.lock(), |event| {
                proxy
                    .send_event(event)
                    .map_err(|_| BridgeError::EventLoopClosed)
            });
            match result {
                Ok(count) => log::debug!("Redraw stream ended after {} batches", count),
                Err(e) => log::warn!("Redraw stream stopped: {}", e),
            }
        })
}

/// Outbound half of the bridge
pub struct InputSink<W: Write> {
    writer: W,
}

impl InputSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> InputSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write one input and flush it
    pub fn send(&mut self, input: &EncodedInput) -> Result<(), BridgeError> {
        log::trace!("Sending input {}", input);
        writeln!(self.writer, "{}", json::encode_input_line(input.as_str()))?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
