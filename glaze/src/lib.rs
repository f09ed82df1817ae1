//! Glaze - a pixel front-end for a remote screen-oriented editor
//!
//! This crate wires the platform-independent pieces together:
//! - `config`: CLI, config file and environment settings
//! - `bridge`: JSON-lines redraw stream in, encoded input out
//! - `font`: fontdue glyph painter
//! - `keymap`: winit keys to virtual key codes
//! - `app`: the window, event loop and script runner wiring
//! - `snapshot`: PPM export of a rendered surface

pub mod app;
pub mod bridge;
pub mod config;
pub mod event;
pub mod font;
pub mod keymap;
pub mod snapshot;
