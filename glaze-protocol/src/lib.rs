//! Glaze Protocol - the boundary between the editor process and the front-end
//!
//! The editor describes its screen as an ordered stream of batches. Each batch
//! is a list of `(command name, argument lists)` calls whose arguments are
//! loosely typed values. This crate provides:
//! - `Value`: the argument value model
//! - `RedrawCall` / `RedrawCommand`: raw calls and their typed decoding
//! - `decode_batch`: lenient batch decoding (unknown commands are skipped)
//! - `json`: the line-oriented framing used by the stdin/stdout bridge

mod color;
mod command;
mod decode;
mod error;
pub mod json;
mod value;

pub use color::Rgb;
pub use command::{HighlightAttrs, RedrawCall, RedrawCommand};
pub use decode::{decode_batch, decode_call};
pub use error::{DecodeError, Result};
pub use value::Value;
