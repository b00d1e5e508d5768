//! The image compositor: the one place the working HSB color space
//! is converted to display RGB.  A normalized field indexes the
//! palette directly -- no blending between neighboring entries -- and
//! each looked-up HSB triple is converted exactly once into the
//! row-major RGB8 output buffer.

use std::fs::File;
use std::io;
use std::path::Path;

use image::png::PNGEncoder;
use image::ColorType;

use normalize::Field;
use palette::Palette;

/// A finished render: a row-major RGB8 buffer with the same
/// dimensions as the field that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RenderedImage {
    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw RGB8 bytes, three per pixel, rows top to bottom.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Converts one HSB byte triple to RGB bytes.  Hue bytes span the
/// full circle (0 and 255 are both red); saturation and brightness
/// span `[0, 1]`.
pub fn hsb_to_rgb(h: u8, s: u8, b: u8) -> (u8, u8, u8) {
    let h = f64::from(h) / 255.0 * 360.0;
    let s = f64::from(s) / 255.0;
    let v = f64::from(b) / 255.0;

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// Maps a normalized field through a palette.  Each value is floored
/// and clamped into `[0, 255]`, used as a direct table index, and the
/// entry converted to RGB; every output pixel is exactly the
/// conversion of one palette entry.
pub fn apply(field: &Field, palette: &Palette) -> RenderedImage {
    let mut pixels = Vec::with_capacity(field.values().len() * 3);
    for v in field.values() {
        let index = num::clamp(v.floor(), 0.0, 255.0) as u8;
        let (h, s, b) = palette.get(index);
        let (r, g, b) = hsb_to_rgb(h, s, b);
        pixels.push(r);
        pixels.push(g);
        pixels.push(b);
    }
    RenderedImage {
        width: field.width(),
        height: field.height(),
        pixels,
    }
}

/// Writes the image to `path` as a PNG.  Encoding is the `image`
/// crate's business; this is just the contract the display layer and
/// the command line call.
pub fn save(image: &RenderedImage, path: &Path) -> io::Result<()> {
    let output = File::create(path)?;
    let encoder = PNGEncoder::new(output);
    encoder.encode(
        image.pixels(),
        image.width() as u32,
        image.height() as u32,
        ColorType::RGB(8),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::{Palette, DEFAULT_CONFIG};

    #[test]
    fn hsb_primaries_convert_exactly() {
        assert_eq!(hsb_to_rgb(0, 255, 255), (255, 0, 0));
        assert_eq!(hsb_to_rgb(85, 255, 255), (0, 255, 0));
        assert_eq!(hsb_to_rgb(170, 255, 255), (0, 0, 255));
    }

    #[test]
    fn zero_saturation_is_grayscale() {
        assert_eq!(hsb_to_rgb(93, 0, 255), (255, 255, 255));
        assert_eq!(hsb_to_rgb(93, 0, 0), (0, 0, 0));
        assert_eq!(hsb_to_rgb(200, 0, 128), (128, 128, 128));
    }

    #[test]
    fn the_hue_circle_wraps_back_to_red() {
        assert_eq!(hsb_to_rgb(255, 255, 255), (255, 0, 0));
    }

    #[test]
    fn apply_indexes_the_palette_without_blending() {
        let palette = Palette::build(&DEFAULT_CONFIG);
        let field = Field::new(2, 1, vec![3.7, 200.0]);
        let image = apply(&field, &palette);

        let (h, s, b) = palette.get(3);
        let expected = hsb_to_rgb(h, s, b);
        assert_eq!(&image.pixels()[0..3], &[expected.0, expected.1, expected.2]);

        let (h, s, b) = palette.get(200);
        let expected = hsb_to_rgb(h, s, b);
        assert_eq!(&image.pixels()[3..6], &[expected.0, expected.1, expected.2]);
    }

    #[test]
    fn apply_clamps_out_of_range_values() {
        let palette = Palette::build(&DEFAULT_CONFIG);
        let field = Field::new(2, 1, vec![-40.0, 9000.0]);
        let image = apply(&field, &palette);

        let (h, s, b) = palette.get(0);
        let low = hsb_to_rgb(h, s, b);
        let (h, s, b) = palette.get(255);
        let high = hsb_to_rgb(h, s, b);
        assert_eq!(&image.pixels()[0..3], &[low.0, low.1, low.2]);
        assert_eq!(&image.pixels()[3..6], &[high.0, high.1, high.2]);
    }

    #[test]
    fn image_dimensions_match_the_field() {
        let palette = Palette::build(&DEFAULT_CONFIG);
        let field = Field::new(3, 2, vec![0.0; 6]);
        let image = apply(&field, &palette);
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.pixels().len(), 18);
    }

    #[test]
    fn save_writes_a_png() {
        let palette = Palette::build(&DEFAULT_CONFIG);
        let field = Field::new(2, 2, vec![0.0, 85.0, 170.0, 255.0]);
        let image = apply(&field, &palette);

        let dir = ::tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        save(&image, &path).unwrap();

        let bytes = ::std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], &[0x89, b'P', b'N', b'G']);
    }
}
