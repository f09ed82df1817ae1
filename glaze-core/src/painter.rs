//! Text rasterization seam

use glaze_protocol::Rgb;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::geometry::{CellSize, Rect};
use crate::screen::TextStyle;
use crate::surface::Surface;

/// Something that can measure and draw text onto a surface
///
/// Cell metrics are fixed for the lifetime of the painter.
pub trait GlyphPainter {
    /// Size of one monospace cell
    fn cell_size(&self) -> CellSize;

    /// Rendered width of `text` in pixels
    fn measure(&self, text: &str) -> u32 {
        text.width() as u32 * self.cell_size().width
    }

    /// Draw `text` with its top-left corner at `(x, y)`
    fn draw_text(
        &mut self,
        surface: &mut Surface,
        x: u32,
        y: u32,
        text: &str,
        color: Rgb,
        style: TextStyle,
    );
}

/// Draws every visible glyph as a solid box
///
/// Regular glyphs leave a one-pixel margin inside their cell, bold glyphs
/// fill the whole cell. Deterministic, font-free, and cheap: used for
/// headless replay and for tests.
#[derive(Debug, Clone, Copy)]
pub struct BlockPainter {
    cell: CellSize,
}

impl BlockPainter {
    pub fn new(cell: CellSize) -> Self {
        Self { cell }
    }
}

impl GlyphPainter for BlockPainter {
    fn cell_size(&self) -> CellSize {
        self.cell
    }

    fn draw_text(
        &mut self,
        surface: &mut Surface,
        x: u32,
        y: u32,
        text: &str,
        color: Rgb,
        style: TextStyle,
    ) {
        let inset = if style.bold { 0 } else { 1 };
        let mut cx = x;
        for c in text.chars() {
            let cells = c.width().unwrap_or(0) as u32;
            let width = cells * self.cell.width;
            if !c.is_whitespace() && width > 0 {
                surface.fill_rect(
                    Rect::new(
                        cx + inset,
                        y + inset,
                        width.saturating_sub(2 * inset),
                        self.cell.height.saturating_sub(2 * inset),
                    ),
                    color,
                );
            }
            cx += width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_uses_display_width() {
        let painter = BlockPainter::new(CellSize::new(8, 16));
        assert_eq!(painter.measure("abc"), 24);
        assert_eq!(painter.measure("日本"), 32);
        assert_eq!(painter.measure(""), 0);
    }

    #[test]
    fn test_draw_leaves_spaces_and_margins() {
        let mut painter = BlockPainter::new(CellSize::new(4, 4));
        let mut surface = Surface::new(12, 4, Rgb::BLACK);
        let white = Rgb::WHITE.to_pixel();
        painter.draw_text(&mut surface, 0, 0, "a b", Rgb::WHITE, TextStyle::default());
        assert_eq!(surface.pixel(0, 0), Some(Rgb::BLACK.to_pixel()));
        assert_eq!(surface.pixel(1, 1), Some(white));
        assert_eq!(surface.pixel(5, 1), Some(Rgb::BLACK.to_pixel()));
        assert_eq!(surface.pixel(9, 1), Some(white));

        let bold = TextStyle {
            bold: true,
            ..Default::default()
        };
        painter.draw_text(&mut surface, 4, 0, "x", Rgb::WHITE, bold);
        assert_eq!(surface.pixel(4, 0), Some(white));
    }
}
