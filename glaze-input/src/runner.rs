//! Timed script execution
//!
//! The runner plays a table of script rows into the editor one row at a time:
//! Escape first, then for every non-blank row highlight it, wait the settle
//! delay, send its input, wait the completion delay and unhighlight it.
//!
//! It never sleeps. The owner calls `poll` from its event loop whenever
//! `next_deadline` passes and performs the returned actions, so redraws keep
//! flowing while a script runs.

use std::time::{Duration, Instant};

use crate::error::{RunnerError, ScriptError};
use crate::key_encoder::{EncodedInput, KeyEncoder};
use crate::keycode::KeyCode;
use crate::layout::{KeyboardLayout, KeyboardState, UsLayout};

/// Delays around each row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerTiming {
    /// Between highlighting a row and sending its input
    pub settle: Duration,
    /// Between sending a row's input and moving on
    pub completion: Duration,
}

impl Default for RunnerTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(500),
            completion: Duration::from_millis(1500),
        }
    }
}

/// Something the owner must do on the runner's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerAction {
    /// Send one input to the editor
    Send(EncodedInput),
    Highlight(usize),
    Unhighlight(usize),
    /// The row's script could not be encoded; none of it was sent
    RowFailed { row: usize, error: ScriptError },
    /// The run is over and a new one may start
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Starting { at: Instant },
    Settling { row: usize, until: Instant },
    Completing { row: usize, until: Instant },
}

/// Sequential runner over a table of script rows
#[derive(Debug)]
pub struct CommandScriptRunner<L = UsLayout> {
    encoder: KeyEncoder<L>,
    timing: RunnerTiming,
    rows: Vec<String>,
    phase: Phase,
}

impl<L: KeyboardLayout> CommandScriptRunner<L> {
    pub fn new(encoder: KeyEncoder<L>, timing: RunnerTiming) -> Self {
        Self {
            encoder,
            timing,
            rows: Vec::new(),
            phase: Phase::Idle,
        }
    }

    pub fn timing(&self) -> RunnerTiming {
        self.timing
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Row currently highlighted, if any
    pub fn current_row(&self) -> Option<usize> {
        match self.phase {
            Phase::Settling { row, .. } | Phase::Completing { row, .. } => Some(row),
            Phase::Idle | Phase::Starting { .. } => None,
        }
    }

    /// Begin a run over `rows`
    ///
    /// The first actions are due at `now`. Fails while a previous run is
    /// still in progress.
    pub fn start(&mut self, rows: Vec<String>, now: Instant) -> Result<(), RunnerError> {
        if self.is_running() {
            return Err(RunnerError::AlreadyRunning);
        }
        log::debug!("Starting script run over {} rows at {:?}", rows.len(), now);
        self.rows = rows;
        self.phase = Phase::Starting { at: now };
        Ok(())
    }

    /// When `poll` next has work, if a run is in progress
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Idle => None,
            Phase::Starting { at } => Some(at),
            Phase::Settling { until, .. } | Phase::Completing { until, .. } => Some(until),
        }
    }

    /// Advance the run to `now`, returning the actions that became due
    pub fn poll(&mut self, now: Instant) -> Vec<RunnerAction> {
        let mut actions = Vec::new();
        loop {
            match self.phase {
                Phase::Idle => break,
                Phase::Starting { at } if now >= at => {
                    if let Some(esc) = self
                        .encoder
                        .encode_with_state(KeyCode::ESCAPE, &KeyboardState::new())
                    {
                        actions.push(RunnerAction::Send(esc));
                    }
                    self.begin_row(0, now, &mut actions);
                }
                Phase::Settling { row, until } if now >= until => {
                    match self.encode_row(row) {
                        Ok(inputs) => {
                            actions.extend(inputs.into_iter().map(RunnerAction::Send));
                            self.phase = Phase::Completing {
                                row,
                                until: now + self.timing.completion,
                            };
                        }
                        Err(error) => {
                            log::warn!("Script row {} failed: {}", row + 1, error);
                            actions.push(RunnerAction::RowFailed { row, error });
                            actions.push(RunnerAction::Unhighlight(row));
                            self.begin_row(row + 1, now, &mut actions);
                        }
                    }
                }
                Phase::Completing { row, until } if now >= until => {
                    actions.push(RunnerAction::Unhighlight(row));
                    self.begin_row(row + 1, now, &mut actions);
                }
                Phase::Starting { .. } | Phase::Settling { .. } | Phase::Completing { .. } => {
                    break
                }
            }
        }
        actions
    }

    /// Highlight the first non-blank row at or after `from`, or finish
    fn begin_row(&mut self, from: usize, now: Instant, actions: &mut Vec<RunnerAction>) {
        let next = (from..self.rows.len()).find(|&i| !self.rows[i].trim().is_empty());
        match next {
            Some(row) => {
                actions.push(RunnerAction::Highlight(row));
                self.phase = Phase::Settling {
                    row,
                    until: now + self.timing.settle,
                };
            }
            None => {
                log::debug!("Script run finished");
                actions.push(RunnerAction::Finished);
                self.rows.clear();
                self.phase = Phase::Idle;
            }
        }
    }

    /// Encode a whole row before any of it is sent
    fn encode_row(&self, row: usize) -> Result<Vec<EncodedInput>, ScriptError> {
        self.encoder.encode_script(&self.rows[row]).collect()
    }
}
