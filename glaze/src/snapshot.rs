//! Binary PPM export

use std::io::{self, Write};

use glaze_core::Rgb;

/// Write `pixels` (`width × height`, row-major) as a binary PPM (P6)
pub fn write_ppm<W: Write>(
    writer: &mut W,
    pixels: &[u32],
    width: u32,
    height: u32,
) -> io::Result<()> {
    let expected = width as usize * height as usize;
    if pixels.len() < expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} pixels for a {}x{} image", pixels.len(), width, height),
        ));
    }

    write!(writer, "P6\n{} {}\n255\n", width, height)?;
    let mut bytes = Vec::with_capacity(expected * 3);
    for &pixel in &pixels[..expected] {
        let Rgb { r, g, b } = Rgb::from_pixel(pixel);
        bytes.extend_from_slice(&[r, g, b]);
    }
    writer.write_all(&bytes)?;
    writer.flush()
}
