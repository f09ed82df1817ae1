//! Glaze Core - screen model and pixel rendering for a remote editor
//!
//! This crate turns the editor's redraw stream into pixels:
//! - `ScreenState`: grid size, cell metrics, cursor, scroll region, colours
//! - `Surface` / `SurfaceRenderer`: the primary and scratch pixel buffers
//! - `GlyphPainter`: the seam to whatever rasterizes text
//! - `RedrawInterpreter`: applies command batches to the state and surfaces
//!
//! Nothing here touches a window or a thread. The caller owns the interpreter
//! on its UI thread and hands it batches in arrival order.

mod geometry;
mod interpreter;
mod painter;
mod renderer;
mod screen;
mod surface;

pub use geometry::{CellSize, Rect};
pub use interpreter::{BatchOutcome, RedrawInterpreter};
pub use painter::{BlockPainter, GlyphPainter};
pub use renderer::{Frame, SurfaceRenderer};
pub use screen::{ScreenState, TextStyle};
pub use surface::Surface;

pub use glaze_protocol::{RedrawCommand, Rgb};
