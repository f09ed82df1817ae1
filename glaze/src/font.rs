//! fontdue glyph painter
//!
//! Glyphs are rasterized on first use and cached per (char, bold). Italic is
//! drawn by shearing the cached bitmap, so it needs no extra font file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use glaze_core::{CellSize, GlyphPainter, Rgb, Surface, TextStyle};
use thiserror::Error;
use unicode_width::UnicodeWidthChar;

/// Monospace fonts probed when no font is configured
const MONOSPACE_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
    "/Library/Fonts/DejaVuSansMono.ttf",
    "/System/Library/Fonts/Supplemental/Courier New.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
];

/// Fonts consulted for characters the main font lacks
const FALLBACK_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/unifont/unifont.ttf",
    "/usr/share/fonts/unifont/unifont.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
];

#[derive(Debug, Error)]
pub enum FontError {
    #[error("No usable monospace font found; set font.path in the config")]
    NotFound,

    #[error("Failed to read font {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse font {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Glyph cache entry
struct GlyphEntry {
    /// Alpha values, row-major
    bitmap: Vec<u8>,
    width: usize,
    height: usize,
    xmin: i32,
    ymin: i32,
}

pub struct FontPainter {
    font: Font,
    bold_font: Option<Font>,
    fallback_fonts: Vec<Font>,
    fallback_fonts_loaded: bool,
    glyph_cache: HashMap<(char, bool), GlyphEntry>,
    cell: CellSize,
    size: f32,
    /// Distance from the cell top to the baseline
    baseline: i32,
}

impl FontPainter {
    /// Load the configured font, or the first well-known monospace font
    pub fn load(path: Option<&Path>, size: f32) -> Result<Self, FontError> {
        let (font, path) = match path {
            Some(path) => (load_font(path)?, path.to_path_buf()),
            None => probe_monospace()?,
        };
        log::debug!("Using font {:?} at {}px", path, size);

        let bold_font = bold_variant(&path).and_then(|p| load_font(&p).ok());
        if bold_font.is_none() {
            log::debug!("No bold variant for {:?}; bold uses the regular face", path);
        }

        Ok(Self::from_fonts(font, bold_font, size))
    }

    fn from_fonts(font: Font, bold_font: Option<Font>, size: f32) -> Self {
        let metrics = font.metrics('M', size);
        let cell = CellSize::new(
            metrics.advance_width.ceil().max(1.0) as u32,
            (size * 1.4).ceil() as u32,
        );
        let baseline = size.round() as i32;

        Self {
            font,
            bold_font,
            fallback_fonts: Vec::new(),
            fallback_fonts_loaded: false,
            glyph_cache: HashMap::with_capacity(128),
            cell,
            size,
            baseline,
        }
    }

    fn ensure_glyph_cached(&mut self, c: char, bold: bool) {
        let key = (c, bold);
        if self.glyph_cache.contains_key(&key) {
            return;
        }

        let font = if bold {
            self.bold_font.as_ref().unwrap_or(&self.font)
        } else {
            &self.font
        };

        let (metrics, bitmap) = if font.lookup_glyph_index(c) != 0 {
            font.rasterize(c, self.size)
        } else {
            if !self.fallback_fonts_loaded {
                self.fallback_fonts_loaded = true;
                self.fallback_fonts = load_fallback_fonts();
            }
            let font = if bold {
                self.bold_font.as_ref().unwrap_or(&self.font)
            } else {
                &self.font
            };
            self.fallback_fonts
                .iter()
                .find(|f| f.lookup_glyph_index(c) != 0)
                .map(|f| f.rasterize(c, self.size))
                // Primary font as last resort draws its missing-glyph box
                .unwrap_or_else(|| font.rasterize(c, self.size))
        };

        self.glyph_cache.insert(
            key,
            GlyphEntry {
                bitmap,
                width: metrics.width,
                height: metrics.height,
                xmin: metrics.xmin,
                ymin: metrics.ymin,
            },
        );
    }
}

impl GlyphPainter for FontPainter {
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
        let mut cx = x as i32;
        for c in text.chars() {
            let cells = c.width().unwrap_or(0) as i32;
            if cells == 0 {
                continue;
            }
            if !c.is_whitespace() {
                self.ensure_glyph_cached(c, style.bold);
                if let Some(glyph) = self.glyph_cache.get(&(c, style.bold)) {
                    draw_glyph(surface, cx, y as i32 + self.baseline, glyph, color, style.italic);
                }
            }
            cx += cells * self.cell.width as i32;
        }
    }
}

/// Blend one cached glyph with its baseline at `baseline_y`
fn draw_glyph(
    surface: &mut Surface,
    x: i32,
    baseline_y: i32,
    glyph: &GlyphEntry,
    color: Rgb,
    italic: bool,
) {
    if glyph.width == 0 || glyph.height == 0 {
        return;
    }

    let gx = x + glyph.xmin;
    let gy = baseline_y - glyph.ymin - glyph.height as i32;

    for dy in 0..glyph.height {
        let py = gy + dy as i32;
        if py < 0 {
            continue;
        }
        let shift = if italic {
            italic_shift(glyph.height - dy, glyph.ymin)
        } else {
            0
        };
        for dx in 0..glyph.width {
            let px = gx + dx as i32 + shift;
            if px < 0 {
                continue;
            }
            let alpha = glyph.bitmap[dy * glyph.width + dx];
            if alpha != 0 {
                surface.blend_pixel(px as u32, py as u32, color, alpha);
            }
        }
    }
}

/// Horizontal offset for a bitmap row `height_from_bottom` rows up
///
/// Rows above the baseline lean right, rows below it lean left.
fn italic_shift(height_from_bottom: usize, ymin: i32) -> i32 {
    (height_from_bottom as i32 + ymin) / 4
}

fn load_font(path: &Path) -> Result<Font, FontError> {
    let data = fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Font::from_bytes(data, FontSettings::default()).map_err(|message| FontError::Parse {
        path: path.to_path_buf(),
        message: message.to_string(),
    })
}

fn probe_monospace() -> Result<(Font, PathBuf), FontError> {
    for path in MONOSPACE_PATHS.iter().map(Path::new) {
        if !path.exists() {
            continue;
        }
        match load_font(path) {
            Ok(font) => return Ok((font, path.to_path_buf())),
            Err(e) => log::debug!("Skipping font: {}", e),
        }
    }
    Err(FontError::NotFound)
}

fn load_fallback_fonts() -> Vec<Font> {
    let fonts: Vec<Font> = FALLBACK_PATHS
        .iter()
        .filter_map(|path| {
            let font = load_font(Path::new(path)).ok()?;
            log::debug!("Loaded fallback font: {}", path);
            Some(font)
        })
        .collect();
    if fonts.is_empty() {
        log::warn!("No fallback fonts found for symbol support");
    }
    fonts
}

/// Guess the bold face's file name from the regular one
fn bold_variant(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let ext = path.extension()?.to_str()?;
    let bold_stem = match stem.strip_suffix("-Regular") {
        Some(base) => format!("{}-Bold", base),
        None => format!("{}-Bold", stem),
    };
    Some(path.with_file_name(format!("{}.{}", bold_stem, ext)))
}
