//! Glaze Input - keyboard and script encoding for the editor
//!
//! The editor accepts input as a stream of encoded strings, each either one
//! literal character or one bracketed key name such as `<Esc>` or `<C-a>`.
//! This crate provides:
//! - `KeyCode` / `KeyboardState`: platform-neutral keys and modifier vectors
//! - `KeyboardLayout`: the key translation primitive (`UsLayout`)
//! - `KeyEncoder`: physical key presses to encoded input
//! - `CommandScriptEncoder`: human-authored scripts to encoded input
//! - `CommandScriptRunner`: timed, row-by-row execution of scripts

mod error;
mod key_encoder;
mod keycode;
mod layout;
mod runner;
mod script;

pub use error::{RunnerError, ScriptError};
pub use key_encoder::{is_shift_required, EncodedInput, KeyEncoder, KeyEvent};
pub use keycode::{KeyCode, Modifiers};
pub use layout::{KeyboardLayout, KeyboardState, UsLayout};
pub use runner::{CommandScriptRunner, RunnerAction, RunnerTiming};
pub use script::{tokenize, CommandScriptEncoder, CommandToken, Tokens};
