//! Redraw interpreter
//!
//! Applies batches of `RedrawCommand`s to the `ScreenState` and the renderer's
//! surfaces. A batch is applied under one bound `Frame`, so the presentation
//! side sees either the state before the batch or the state after it.

use glaze_protocol::{RedrawCommand, Rgb};

use crate::geometry::Rect;
use crate::painter::GlyphPainter;
use crate::renderer::{Frame, SurfaceRenderer};
use crate::screen::ScreenState;

/// What a batch changed, for the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Visible pixels changed; the view needs repainting
    pub dirty: bool,
    /// Last title set by the batch
    pub title: Option<String>,
    /// New grid size if the batch resized the screen
    pub resized: Option<(u32, u32)>,
}

/// Owner of the screen state, the surfaces and the glyph painter
pub struct RedrawInterpreter<P: GlyphPainter> {
    state: ScreenState,
    renderer: SurfaceRenderer,
    painter: P,
}

impl<P: GlyphPainter> RedrawInterpreter<P> {
    /// Create an interpreter for a `cols × rows` grid
    ///
    /// Cell metrics are taken from `painter` and stay fixed from here on.
    /// `foreground` and `background` are also the defaults restored by a
    /// negative colour update.
    pub fn new(cols: u32, rows: u32, painter: P, foreground: Rgb, background: Rgb) -> Self {
        let state = ScreenState::new(cols, rows, painter.cell_size(), foreground, background);
        let renderer = SurfaceRenderer::new(state.pixel_width(), state.pixel_height(), background);
        Self {
            state,
            renderer,
            painter,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn renderer(&self) -> &SurfaceRenderer {
        &self.renderer
    }

    pub fn painter(&self) -> &P {
        &self.painter
    }

    /// Apply one batch in order
    pub fn apply(&mut self, batch: &[RedrawCommand]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let state = &mut self.state;
        let painter = &mut self.painter;
        let mut frame = self.renderer.bind();

        for command in batch {
            if command.is_visual() {
                outcome.dirty = true;
            }
            match command {
                RedrawCommand::Clear => frame.clear(),
                RedrawCommand::Resize { cols, rows } => {
                    if resize(state, &mut frame, *cols, *rows) {
                        outcome.dirty = true;
                        outcome.resized = Some((state.cols(), state.rows()));
                    }
                }
                RedrawCommand::SetForeground(color) => state.set_foreground(*color),
                RedrawCommand::SetBackground(color) => {
                    state.set_background(*color);
                    frame.set_clear_color(state.background());
                }
                RedrawCommand::HighlightSet(attrs) => state.apply_highlight(attrs),
                RedrawCommand::EolClear => frame.fill_rect(state.rest_of_row(), state.background()),
                RedrawCommand::SetTitle(title) => {
                    state.set_title(title.clone());
                    outcome.title = Some(title.clone());
                }
                RedrawCommand::Put(bytes) => put(state, &mut frame, painter, bytes),
                RedrawCommand::CursorGoto { row, col } => state.goto(*row, *col),
                RedrawCommand::Scroll(count) => scroll(state, &mut frame, *count),
                RedrawCommand::SetScrollRegion {
                    top,
                    bottom,
                    left,
                    right,
                } => state.set_scroll_region(*top, *bottom, *left, *right),
                RedrawCommand::ModeChange(mode) => mode_change(state, mode),
            }
        }

        outcome
    }

    /// Render the primary surface into a presentation buffer
    ///
    /// The cursor is overlaid only when `cursor_visible` is set.
    pub fn present(&self, target: &mut [u32], width: u32, height: u32, cursor_visible: bool) {
        let cursor = cursor_visible.then(|| self.state.cursor());
        self.renderer.present(target, width, height, cursor);
    }
}

/// Returns whether the size actually changed
///
/// Sizes whose surfaces would exceed the pixel limits are skipped.
fn resize(state: &mut ScreenState, frame: &mut Frame<'_>, cols: u32, rows: u32) -> bool {
    let (cols, rows) = (cols.max(1), rows.max(1));
    if cols == state.cols() && rows == state.rows() {
        return false;
    }
    if state.grid_pixel_size(cols, rows).is_none() {
        log::debug!("Skipping resize to {}x{}: surface too large", cols, rows);
        return false;
    }
    log::debug!(
        "Resize {}x{} -> {}x{}",
        state.cols(),
        state.rows(),
        cols,
        rows
    );
    state.resize(cols, rows);
    frame.recreate(state.pixel_width(), state.pixel_height());
    true
}

fn put<P: GlyphPainter>(
    state: &mut ScreenState,
    frame: &mut Frame<'_>,
    painter: &mut P,
    bytes: &[u8],
) {
    let text = String::from_utf8_lossy(bytes);
    if text.is_empty() {
        return;
    }

    let width = painter.measure(&text);
    let cursor = state.cursor();
    let cell_height = state.cell_size().height;
    let (glyph, fill) = state.text_colors();
    let style = state.style();

    frame.fill_rect(Rect::new(cursor.x, cursor.y, width, cell_height), fill);
    painter.draw_text(frame.surface_mut(), cursor.x, cursor.y, &text, glyph, style);
    if style.underline {
        frame.fill_rect(
            Rect::new(cursor.x, cursor.y + cell_height.saturating_sub(1), width, 1),
            glyph,
        );
    }

    state.advance(width);
}

fn scroll(state: &ScreenState, frame: &mut Frame<'_>, count: i32) {
    if count == 0 {
        return;
    }
    let exposed = frame.scroll(state.scroll_region(), count, state.cell_size().height);
    frame.fill_rect(exposed, state.background());
}

fn mode_change(state: &mut ScreenState, mode: &str) {
    let cell_width = state.cell_size().width;
    match mode {
        "insert" => state.set_cursor_width((cell_width / 4).max(1)),
        "normal" => state.set_cursor_width(cell_width),
        other => log::trace!("Ignoring mode {:?}", other),
    }
}
