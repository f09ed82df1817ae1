//! Screen state
//!
//! The pixel-space model of the editor's screen: grid size, cell metrics,
//! cursor, scroll region, colours and text style. The interpreter is its only
//! writer; everyone else gets a shared borrow.

use glaze_protocol::{HighlightAttrs, Rgb};

use crate::geometry::{CellSize, Rect};

/// Largest surface side the grid may grow to, in pixels
pub const MAX_SURFACE_SIDE: u32 = 16_384;

/// Largest surface area the grid may grow to, in pixels
pub const MAX_SURFACE_PIXELS: u64 = 1 << 25;

/// Text style flags applied to `put`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub reverse: bool,
}

/// Screen model in pixel coordinates
#[derive(Debug, Clone)]
pub struct ScreenState {
    cols: u32,
    rows: u32,
    cell: CellSize,
    /// Position and size of the cursor; width depends on the mode
    cursor: Rect,
    scroll_region: Rect,
    foreground: Rgb,
    background: Rgb,
    default_foreground: Rgb,
    default_background: Rgb,
    /// Fill colour for `put` set by the current highlight
    highlight_background: Option<Rgb>,
    style: TextStyle,
    title: String,
}

impl ScreenState {
    /// Create a state for a `cols × rows` grid of `cell`-sized cells
    pub fn new(cols: u32, rows: u32, cell: CellSize, foreground: Rgb, background: Rgb) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cell,
            cursor: Rect::new(0, 0, cell.width, cell.height),
            scroll_region: Rect::new(0, 0, cols * cell.width, rows * cell.height),
            foreground,
            background,
            default_foreground: foreground,
            default_background: background,
            highlight_background: None,
            style: TextStyle::default(),
            title: String::new(),
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell
    }

    pub fn cursor(&self) -> Rect {
        self.cursor
    }

    pub fn scroll_region(&self) -> Rect {
        self.scroll_region
    }

    pub fn foreground(&self) -> Rgb {
        self.foreground
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Grid width in pixels
    pub fn pixel_width(&self) -> u32 {
        self.cols * self.cell.width
    }

    /// Grid height in pixels
    pub fn pixel_height(&self) -> u32 {
        self.rows * self.cell.height
    }

    /// Pixel size of a `cols × rows` grid, or `None` past the surface limits
    pub fn grid_pixel_size(&self, cols: u32, rows: u32) -> Option<(u32, u32)> {
        let width = cols.checked_mul(self.cell.width)?;
        let height = rows.checked_mul(self.cell.height)?;
        let fits = width <= MAX_SURFACE_SIDE
            && height <= MAX_SURFACE_SIDE
            && width as u64 * height as u64 <= MAX_SURFACE_PIXELS;
        fits.then_some((width, height))
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.pixel_width(), self.pixel_height())
    }

    /// Glyph colour and cell fill colour for `put`, honouring `reverse`
    pub fn text_colors(&self) -> (Rgb, Rgb) {
        let fill = self.highlight_background.unwrap_or(self.background);
        if self.style.reverse {
            (fill, self.foreground)
        } else {
            (self.foreground, fill)
        }
    }

    /// The span from the cursor to the right edge of its row
    pub fn rest_of_row(&self) -> Rect {
        Rect::new(
            self.cursor.x,
            self.cursor.y,
            self.pixel_width().saturating_sub(self.cursor.x),
            self.cell.height,
        )
    }

    /// Change the grid size, keeping the cursor inside and resetting the
    /// scroll region to the full grid
    pub(crate) fn resize(&mut self, cols: u32, rows: u32) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.scroll_region = self.bounds();
        self.cursor.x = self.cursor.x.min(self.last_col_x());
        self.cursor.y = self.cursor.y.min(self.last_row_y());
    }

    /// Move the cursor to a cell, clamped into the grid
    pub(crate) fn goto(&mut self, row: u32, col: u32) {
        self.cursor.x = col.min(self.cols - 1) * self.cell.width;
        self.cursor.y = row.min(self.rows - 1) * self.cell.height;
    }

    /// Advance the cursor after drawing `width` pixels of text
    ///
    /// Reaching the right edge wraps to the start of the next row. The last
    /// row has no next row, so the cursor stays on it.
    pub(crate) fn advance(&mut self, width: u32) {
        self.cursor.x = self.cursor.x.saturating_add(width);
        if self.cursor.x >= self.pixel_width() {
            self.cursor.x = 0;
            self.cursor.y = (self.cursor.y + self.cell.height).min(self.last_row_y());
        }
    }

    pub(crate) fn set_cursor_width(&mut self, width: u32) {
        self.cursor.width = width.max(1);
    }

    /// Set the scroll region from inclusive cell bounds
    pub(crate) fn set_scroll_region(&mut self, top: u32, bottom: u32, left: u32, right: u32) {
        let top = top.min(self.rows - 1);
        let bottom = bottom.clamp(top, self.rows - 1);
        let left = left.min(self.cols - 1);
        let right = right.clamp(left, self.cols - 1);
        self.scroll_region = Rect::new(
            left * self.cell.width,
            top * self.cell.height,
            (right - left + 1) * self.cell.width,
            (bottom - top + 1) * self.cell.height,
        );
    }

    pub(crate) fn set_foreground(&mut self, color: Option<Rgb>) {
        self.foreground = color.unwrap_or(self.default_foreground);
    }

    pub(crate) fn set_background(&mut self, color: Option<Rgb>) {
        self.background = color.unwrap_or(self.default_background);
    }

    /// Apply the attributes present in `attrs`, leaving the rest unchanged
    pub(crate) fn apply_highlight(&mut self, attrs: &HighlightAttrs) {
        if let Some(fg) = attrs.foreground {
            self.foreground = fg;
        }
        if let Some(bg) = attrs.background {
            self.highlight_background = Some(bg);
        }
        if let Some(bold) = attrs.bold {
            self.style.bold = bold;
        }
        if let Some(italic) = attrs.italic {
            self.style.italic = italic;
        }
        if let Some(underline) = attrs.underline {
            self.style.underline = underline;
        }
        if let Some(reverse) = attrs.reverse {
            self.style.reverse = reverse;
        }
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    fn last_col_x(&self) -> u32 {
        (self.cols - 1) * self.cell.width
    }

    fn last_row_y(&self) -> u32 {
        (self.rows - 1) * self.cell.height
    }
}
