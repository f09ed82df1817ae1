//! Double-surface renderer
//!
//! `SurfaceRenderer` owns two same-sized surfaces. `primary` holds the screen
//! as the editor described it and is the only surface ever presented.
//! `scratch` is the ping-pong target that lets a scroll read and write the
//! same region of `primary` without the source and destination overlapping.
//!
//! Drawing goes through a `Frame`, which mutably borrows the renderer for the
//! duration of one batch. While a frame is bound nothing can present, so the
//! presentation side never observes a half-applied batch.

use glaze_protocol::Rgb;

use crate::geometry::Rect;
use crate::surface::Surface;

/// Owner of the primary and scratch surfaces
#[derive(Debug)]
pub struct SurfaceRenderer {
    primary: Surface,
    scratch: Surface,
    clear_color: Rgb,
}

impl SurfaceRenderer {
    /// Create both surfaces at `width × height`, cleared to `clear_color`
    pub fn new(width: u32, height: u32, clear_color: Rgb) -> Self {
        Self {
            primary: Surface::new(width, height, clear_color),
            scratch: Surface::new(width, height, clear_color),
            clear_color,
        }
    }

    pub fn primary(&self) -> &Surface {
        &self.primary
    }

    pub fn clear_color(&self) -> Rgb {
        self.clear_color
    }

    pub fn width(&self) -> u32 {
        self.primary.width()
    }

    pub fn height(&self) -> u32 {
        self.primary.height()
    }

    /// Bind `primary` as the render target until the frame is dropped
    pub fn bind(&mut self) -> Frame<'_> {
        log::trace!("Binding primary surface");
        Frame { renderer: self }
    }

    /// Copy `primary` into a presentation buffer and overlay the cursor
    ///
    /// `target` is a row-major `width × height` ARGB buffer. Area outside the
    /// grid is filled with the clear colour. The cursor is drawn by inverting
    /// the pixels under it, so it stays visible on any background and never
    /// touches `primary` itself.
    pub fn present(&self, target: &mut [u32], width: u32, height: u32, cursor: Option<Rect>) {
        let width = width as usize;
        let height = height as usize;
        if width == 0 || target.len() < width * height {
            return;
        }

        let clear = self.clear_color.to_pixel();
        let copy_width = width.min(self.primary.width() as usize);
        for (y, row) in target.chunks_exact_mut(width).take(height).enumerate() {
            if y < self.primary.height() as usize {
                row[..copy_width].copy_from_slice(&self.primary.row(y as u32)[..copy_width]);
                row[copy_width..].fill(clear);
            } else {
                row.fill(clear);
            }
        }

        let Some(cursor) = cursor else {
            return;
        };
        let visible = cursor.intersect(&Rect::new(0, 0, width as u32, height as u32));
        for y in visible.y..visible.bottom() {
            let start = y as usize * width + visible.x as usize;
            for pixel in &mut target[start..start + visible.width as usize] {
                *pixel ^= 0x00FF_FFFF;
            }
        }
    }
}

/// A bound render target
///
/// Every drawing operation of a batch goes through the frame. Dropping it
/// unbinds the surfaces.
pub struct Frame<'a> {
    renderer: &'a mut SurfaceRenderer,
}

impl Frame<'_> {
    /// The bound primary surface
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.renderer.primary
    }

    /// Blank the primary surface to the clear colour
    pub fn clear(&mut self) {
        let color = self.renderer.clear_color;
        self.renderer.primary.fill(color);
    }

    pub fn set_clear_color(&mut self, color: Rgb) {
        self.renderer.clear_color = color;
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.renderer.primary.fill_rect(rect, color);
    }

    /// Replace both surfaces with new ones of the given size
    pub fn recreate(&mut self, width: u32, height: u32) {
        log::debug!("Recreating surfaces at {}x{}", width, height);
        let color = self.renderer.clear_color;
        self.renderer.primary = Surface::new(width, height, color);
        self.renderer.scratch = Surface::new(width, height, color);
    }

    /// Move the contents of `region` by `count` lines of `line_height` pixels
    ///
    /// Positive counts move content up, negative counts move it down. The
    /// move is two unscaled blits (primary to scratch, scratch back to
    /// primary) over the surviving part of the region, so its cost depends
    /// only on the region's pixel area. Returns the strip that was exposed
    /// by the move; its contents are left for the caller to repaint.
    pub fn scroll(&mut self, region: Rect, count: i32, line_height: u32) -> Rect {
        let region = region.intersect(&self.renderer.primary.bounds());
        if count == 0 || region.is_empty() {
            return Rect::new(region.x, region.y, region.width, 0);
        }

        let shift = count.unsigned_abs().saturating_mul(line_height);
        if shift >= region.height {
            return region;
        }

        let kept = region.height - shift;
        let (src, dst, exposed) = if count > 0 {
            (
                Rect::new(region.x, region.y + shift, region.width, kept),
                Rect::new(region.x, region.y, region.width, kept),
                Rect::new(region.x, region.y + kept, region.width, shift),
            )
        } else {
            (
                Rect::new(region.x, region.y, region.width, kept),
                Rect::new(region.x, region.y + shift, region.width, kept),
                Rect::new(region.x, region.y, region.width, shift),
            )
        };

        let renderer = &mut *self.renderer;
        renderer.scratch.blit(&renderer.primary, src, dst);
        renderer.primary.blit(&renderer.scratch, dst, dst);

        exposed
    }
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        log::trace!("Unbinding primary surface");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const GREEN: Rgb = Rgb::new(0, 255, 0);

    /// 2 px wide, 4 rows of 2 px each, row n filled with shade n
    fn striped() -> SurfaceRenderer {
        let mut renderer = SurfaceRenderer::new(2, 8, Rgb::BLACK);
        {
            let mut frame = renderer.bind();
            for row in 0..4u8 {
                frame.fill_rect(Rect::new(0, row as u32 * 2, 2, 2), Rgb::new(row * 10, 0, 0));
            }
        }
        renderer
    }

    fn shade(renderer: &SurfaceRenderer, y: u32) -> u8 {
        Rgb::from_pixel(renderer.primary().pixel(0, y).unwrap()).r
    }

    #[test]
    fn test_scroll_up_moves_rows() {
        let mut renderer = striped();
        let exposed = renderer.bind().scroll(Rect::new(0, 0, 2, 8), 1, 2);
        assert_eq!(exposed, Rect::new(0, 6, 2, 2));
        assert_eq!(shade(&renderer, 0), 10);
        assert_eq!(shade(&renderer, 2), 20);
        assert_eq!(shade(&renderer, 4), 30);
    }

    #[test]
    fn test_scroll_down_moves_rows() {
        let mut renderer = striped();
        let exposed = renderer.bind().scroll(Rect::new(0, 0, 2, 8), -2, 2);
        assert_eq!(exposed, Rect::new(0, 0, 2, 4));
        assert_eq!(shade(&renderer, 4), 0);
        assert_eq!(shade(&renderer, 6), 10);
    }

    #[test]
    fn test_scroll_region_leaves_outside_untouched() {
        let mut renderer = striped();
        let exposed = renderer.bind().scroll(Rect::new(0, 2, 2, 4), 1, 2);
        assert_eq!(exposed, Rect::new(0, 4, 2, 2));
        assert_eq!(shade(&renderer, 0), 0);
        assert_eq!(shade(&renderer, 2), 20);
        assert_eq!(shade(&renderer, 6), 30);
    }

    #[test]
    fn test_scroll_past_region_exposes_everything() {
        let mut renderer = striped();
        let region = Rect::new(0, 0, 2, 8);
        assert_eq!(renderer.bind().scroll(region, 4, 2), region);
        assert_eq!(renderer.bind().scroll(region, -9, 2), region);
    }

    #[test]
    fn test_recreate_and_clear_color() {
        let mut renderer = SurfaceRenderer::new(2, 2, Rgb::BLACK);
        {
            let mut frame = renderer.bind();
            frame.set_clear_color(GREEN);
            frame.recreate(3, 1);
        }
        assert_eq!(renderer.width(), 3);
        assert_eq!(renderer.height(), 1);
        assert_eq!(renderer.primary().pixel(2, 0), Some(GREEN.to_pixel()));
    }

    #[test]
    fn test_present_overlays_inverted_cursor() {
        let mut renderer = SurfaceRenderer::new(2, 2, Rgb::BLACK);
        renderer.bind().fill_rect(Rect::new(0, 0, 1, 1), RED);

        let mut target = vec![0u32; 3 * 3];
        renderer.present(&mut target, 3, 3, Some(Rect::new(1, 1, 1, 1)));
        assert_eq!(target[0], RED.to_pixel());
        assert_eq!(target[4], Rgb::WHITE.to_pixel());
        // Outside the grid is clear colour
        assert_eq!(target[2], Rgb::BLACK.to_pixel());
        assert_eq!(target[6], Rgb::BLACK.to_pixel());
        // Presenting never changes the primary surface
        assert_eq!(renderer.primary().pixel(1, 1), Some(Rgb::BLACK.to_pixel()));
    }
}
