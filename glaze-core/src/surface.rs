//! CPU pixel surfaces
//!
//! A `Surface` is a row-major buffer of opaque ARGB pixels, the same layout
//! softbuffer presents. All drawing is clipped to the surface bounds.

use glaze_protocol::Rgb;

use crate::geometry::Rect;

/// A fixed-size pixel buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Surface {
    /// Create a surface filled with `color`
    pub fn new(width: u32, height: u32, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color.to_pixel(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, if inside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    /// One row of pixels
    pub fn row(&self, y: u32) -> &[u32] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color.to_pixel());
    }

    /// Fill a rectangle, clipped to the surface
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let rect = rect.intersect(&self.bounds());
        if rect.is_empty() {
            return;
        }
        let pixel = color.to_pixel();
        for y in rect.y..rect.bottom() {
            let start = self.index(rect.x, y);
            self.pixels[start..start + rect.width as usize].fill(pixel);
        }
    }

    /// Blend `color` over the pixel at `(x, y)` with the given coverage
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgb, alpha: u8) {
        if x >= self.width || y >= self.height || alpha == 0 {
            return;
        }
        let idx = self.index(x, y);
        if alpha == 255 {
            self.pixels[idx] = color.to_pixel();
            return;
        }

        let existing = Rgb::from_pixel(self.pixels[idx]);
        let a = alpha as u32;
        let ia = 255 - a;
        let mix = |c: u8, e: u8| ((c as u32 * a + e as u32 * ia) / 255) as u8;
        self.pixels[idx] = Rgb::new(
            mix(color.r, existing.r),
            mix(color.g, existing.g),
            mix(color.b, existing.b),
        )
        .to_pixel();
    }

    /// Copy `src_rect` of `src` into `dst_rect` of this surface
    ///
    /// The copy is unscaled: the overlapping size of both rectangles is
    /// copied row by row, clipped to both surfaces.
    pub fn blit(&mut self, src: &Surface, src_rect: Rect, dst_rect: Rect) {
        let width = src_rect
            .width
            .min(dst_rect.width)
            .min(src.width.saturating_sub(src_rect.x))
            .min(self.width.saturating_sub(dst_rect.x)) as usize;
        let height = src_rect
            .height
            .min(dst_rect.height)
            .min(src.height.saturating_sub(src_rect.y))
            .min(self.height.saturating_sub(dst_rect.y));
        if width == 0 {
            return;
        }

        for dy in 0..height {
            let from = src.index(src_rect.x, src_rect.y + dy);
            let to = self.index(dst_rect.x, dst_rect.y + dy);
            self.pixels[to..to + width].copy_from_slice(&src.pixels[from..from + width]);
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn test_fill_rect_clips() {
        let mut s = Surface::new(4, 4, Rgb::BLACK);
        s.fill_rect(Rect::new(2, 2, 10, 10), RED);
        assert_eq!(s.pixel(1, 1), Some(Rgb::BLACK.to_pixel()));
        assert_eq!(s.pixel(3, 3), Some(RED.to_pixel()));
        assert_eq!(s.pixel(4, 4), None);
    }

    #[test]
    fn test_blit_copies_sub_rectangle() {
        let mut src = Surface::new(4, 4, Rgb::BLACK);
        src.fill_rect(Rect::new(0, 2, 4, 2), RED);
        let mut dst = Surface::new(4, 4, Rgb::WHITE);
        dst.blit(&src, Rect::new(0, 2, 4, 2), Rect::new(0, 0, 4, 2));
        assert_eq!(dst.row(0), &[RED.to_pixel(); 4]);
        assert_eq!(dst.row(1), &[RED.to_pixel(); 4]);
        assert_eq!(dst.row(2), &[Rgb::WHITE.to_pixel(); 4]);
    }

    #[test]
    fn test_blit_clips_to_both_surfaces() {
        let src = Surface::new(2, 2, RED);
        let mut dst = Surface::new(3, 3, Rgb::BLACK);
        dst.blit(&src, Rect::new(0, 0, 5, 5), Rect::new(2, 2, 5, 5));
        assert_eq!(dst.pixel(2, 2), Some(RED.to_pixel()));
        assert_eq!(dst.pixel(1, 1), Some(Rgb::BLACK.to_pixel()));
    }

    #[test]
    fn test_blend_pixel() {
        let mut s = Surface::new(1, 1, Rgb::BLACK);
        s.blend_pixel(0, 0, Rgb::WHITE, 255);
        assert_eq!(s.pixel(0, 0), Some(Rgb::WHITE.to_pixel()));
        s.fill(Rgb::BLACK);
        s.blend_pixel(0, 0, Rgb::new(254, 254, 254), 128);
        assert_eq!(s.pixel(0, 0), Some(Rgb::new(127, 127, 127).to_pixel()));
    }
}
