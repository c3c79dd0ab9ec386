//! Pixel and pixel grid types for the 16x16 panel.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::codecs::webp::WebPDecoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, DynamicImage, ImageFormat, ImageReader};

use crate::error::{Error, Result};
use crate::{PANEL_HEIGHT, PANEL_WIDTH};

/// A single RGB pixel. Channels are 8-bit, black by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    /// Creates a pixel from RGB channel values.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// White if `flag` is true, black otherwise.
    pub fn from_bool(flag: bool) -> Self {
        let v = if flag { 255 } else { 0 };
        Self::new(v, v, v)
    }

    /// Parses a `#rrggbb` or `rrggbb` hex color string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::new(r, g, b))
    }

    /// Integer mean of the three channels, truncated.
    pub fn grayscale(&self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8
    }

    /// Six hex characters, each channel zero-padded to two digits.
    pub fn to_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channel values in R,G,B wire order.
    pub fn bytes(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<(u8, u8, u8)> for Pixel {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<[u8; 3]> for Pixel {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// Pixel grid matching the panel, stored as a flat row-major sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pixels: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelGrid {
    /// Creates a 16x16 grid initialized to black.
    pub fn new() -> Self {
        Self::with_dimensions(PANEL_WIDTH, PANEL_HEIGHT)
    }

    /// Creates a grid with custom dimensions, initialized to black.
    pub fn with_dimensions(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![Pixel::default(); width * height],
            width,
            height,
        }
    }

    /// Creates a 16x16 grid from a row-major source of RGB triples.
    ///
    /// `rows[y][x]` becomes the pixel at `(x, y)`.
    pub fn from_rows(rows: &[Vec<(u8, u8, u8)>]) -> Result<Self> {
        let mut grid = Self::new();
        if rows.len() != grid.height {
            return Err(Error::GridShape {
                expected: grid.height,
                actual: rows.len(),
            });
        }
        for (y, row) in rows.iter().enumerate() {
            if row.len() != grid.width {
                return Err(Error::GridShape {
                    expected: grid.width,
                    actual: row.len(),
                });
            }
            for (x, &rgb) in row.iter().enumerate() {
                grid.set_pixel(x, y, rgb)?;
            }
        }
        Ok(grid)
    }

    /// Returns the width of the grid.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height of the grid.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the flat pixel sequence.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.height + x)
    }

    /// Gets the pixel at `(x, y)`.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<Pixel> {
        let idx = self.index(x, y)?;
        Ok(self.pixels[idx])
    }

    /// Sets the pixel at `(x, y)` and returns its grayscale value.
    pub fn set_pixel(&mut self, x: usize, y: usize, value: impl Into<Pixel>) -> Result<u8> {
        let idx = self.index(x, y)?;
        let pixel = value.into();
        self.pixels[idx] = pixel;
        Ok(pixel.grayscale())
    }

    /// Clears the grid to a solid color.
    pub fn clear(&mut self, pixel: Pixel) {
        self.pixels.fill(pixel);
    }

    /// Samples a decoded image into a 16x16 grid.
    ///
    /// The image is resized to the panel dimensions with Lanczos3
    /// resampling and converted to RGB before sampling.
    pub fn from_image(image: &DynamicImage) -> Self {
        let (w, h) = (PANEL_WIDTH as u32, PANEL_HEIGHT as u32);
        let resized = if image.width() != w || image.height() != h {
            image.resize_exact(w, h, FilterType::Lanczos3)
        } else {
            image.clone()
        };
        let rgb = resized.to_rgb8();

        let mut grid = Self::new();
        for (x, y, p) in rgb.enumerate_pixels() {
            let idx = y as usize * grid.height + x as usize;
            grid.pixels[idx] = Pixel::new(p[0], p[1], p[2]);
        }
        grid
    }

    /// Loads an image file as an ordered sequence of grids.
    ///
    /// Static images yield a single grid; animated GIF/WebP yield one
    /// grid per frame in temporal order.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(unreadable(path, "no such file"));
        }
        if path.is_dir() {
            return Err(unreadable(path, "path is a directory"));
        }

        let reader = ImageReader::open(path)
            .map_err(|e| unreadable(path, &e.to_string()))?
            .with_guessed_format()
            .map_err(|e| unreadable(path, &e.to_string()))?;

        match reader.format() {
            Some(ImageFormat::Gif) => {
                let file = BufReader::new(
                    File::open(path).map_err(|e| unreadable(path, &e.to_string()))?,
                );
                let decoder =
                    GifDecoder::new(file).map_err(|e| unreadable(path, &e.to_string()))?;
                decode_frames(decoder, path)
            }
            Some(ImageFormat::WebP) => {
                let file = BufReader::new(
                    File::open(path).map_err(|e| unreadable(path, &e.to_string()))?,
                );
                let decoder =
                    WebPDecoder::new(file).map_err(|e| unreadable(path, &e.to_string()))?;
                if decoder.has_animation() {
                    decode_frames(decoder, path)
                } else {
                    let image = DynamicImage::from_decoder(decoder)
                        .map_err(|e| unreadable(path, &e.to_string()))?;
                    Ok(vec![Self::from_image(&image)])
                }
            }
            _ => {
                let image = reader
                    .decode()
                    .map_err(|e| unreadable(path, &e.to_string()))?;
                Ok(vec![Self::from_image(&image)])
            }
        }
    }
}

impl fmt::Display for PixelGrid {
    /// Renders the grid as a grayscale hex map, one row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.height + x;
                write!(f, "{:02x} ", self.pixels[idx].grayscale())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn decode_frames<'a, D>(decoder: D, path: &Path) -> Result<Vec<PixelGrid>>
where
    D: AnimationDecoder<'a>,
{
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| unreadable(path, &e.to_string()))?;
    Ok(frames
        .into_iter()
        .map(|frame| PixelGrid::from_image(&DynamicImage::ImageRgba8(frame.into_buffer())))
        .collect())
}

fn unreadable(path: &Path, reason: &str) -> Error {
    Error::UnreadableImage {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Frame, Rgba, RgbaImage};

    #[test]
    fn test_grayscale_is_truncated_mean() {
        assert_eq!(Pixel::new(10, 20, 30).grayscale(), 20);
        assert_eq!(Pixel::new(1, 1, 2).grayscale(), 1);
        assert_eq!(Pixel::new(255, 255, 255).grayscale(), 255);
        assert_eq!(Pixel::new(0, 0, 0).grayscale(), 0);
        assert_eq!(Pixel::new(255, 0, 0).grayscale(), 85);
    }

    #[test]
    fn test_to_hex_zero_pads() {
        assert_eq!(Pixel::new(255, 0, 10).to_hex(), "ff000a");
        assert_eq!(Pixel::new(0, 0, 0).to_hex(), "000000");
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Pixel::from_hex("#ff000a"), Some(Pixel::new(255, 0, 10)));
        assert_eq!(Pixel::from_hex("00ff00"), Some(Pixel::new(0, 255, 0)));
        assert_eq!(Pixel::from_hex("nope"), None);
        assert_eq!(Pixel::from_hex("#12345"), None);
    }

    #[test]
    fn test_from_bool() {
        assert_eq!(Pixel::from_bool(true), Pixel::new(255, 255, 255));
        assert_eq!(Pixel::from_bool(false), Pixel::new(0, 0, 0));
    }

    #[test]
    fn test_new_grid_is_black() {
        let grid = PixelGrid::new();
        assert_eq!(grid.width(), 16);
        assert_eq!(grid.height(), 16);
        assert_eq!(grid.pixels().len(), 256);
        assert!(grid.pixels().iter().all(|p| *p == Pixel::default()));
    }

    #[test]
    fn test_set_pixel_returns_grayscale() {
        let mut grid = PixelGrid::new();
        assert_eq!(grid.set_pixel(5, 5, (10, 20, 30)).unwrap(), 20);
        assert_eq!(grid.get_pixel(5, 5).unwrap(), Pixel::new(10, 20, 30));
    }

    #[test]
    fn test_bounds() {
        let mut grid = PixelGrid::new();
        assert!(grid.get_pixel(15, 15).is_ok());
        assert!(grid.set_pixel(15, 15, (1, 2, 3)).is_ok());
        assert!(matches!(
            grid.get_pixel(16, 0),
            Err(Error::OutOfBounds { x: 16, y: 0, .. })
        ));
        assert!(matches!(
            grid.set_pixel(0, 16, (1, 2, 3)),
            Err(Error::OutOfBounds { x: 0, y: 16, .. })
        ));
    }

    #[test]
    fn test_from_rows_round_trips() {
        let rows: Vec<Vec<(u8, u8, u8)>> = (0..16)
            .map(|y| (0..16).map(|x| (x as u8, y as u8, 7)).collect())
            .collect();
        let grid = PixelGrid::from_rows(&rows).unwrap();
        for y in 0..16 {
            for x in 0..16 {
                let (r, g, b) = rows[y][x];
                assert_eq!(grid.get_pixel(x, y).unwrap(), Pixel::new(r, g, b));
            }
        }
    }

    #[test]
    fn test_from_rows_rejects_bad_shape() {
        let short: Vec<Vec<(u8, u8, u8)>> = vec![vec![(0, 0, 0); 16]; 15];
        assert!(matches!(
            PixelGrid::from_rows(&short),
            Err(Error::GridShape { .. })
        ));

        let ragged: Vec<Vec<(u8, u8, u8)>> = (0..16)
            .map(|y| vec![(0, 0, 0); if y == 3 { 15 } else { 16 }])
            .collect();
        assert!(matches!(
            PixelGrid::from_rows(&ragged),
            Err(Error::GridShape { .. })
        ));
    }

    #[test]
    fn test_from_image_matches_resample_filter() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            2,
            2,
            Rgba([255, 0, 0, 255]),
        ));
        let expected = source
            .resize_exact(16, 16, FilterType::Lanczos3)
            .to_rgb8();

        let grid = PixelGrid::from_image(&source);
        for (x, y, p) in expected.enumerate_pixels() {
            assert_eq!(
                grid.get_pixel(x as usize, y as usize).unwrap(),
                Pixel::new(p[0], p[1], p[2])
            );
        }
    }

    #[test]
    fn test_load_static_image() {
        let path = std::env::temp_dir().join("merkury_panel_static_test.png");
        let source = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        source.save(&path).unwrap();

        let frames = PixelGrid::load(&path).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(
            frames[0],
            PixelGrid::from_image(&DynamicImage::ImageRgba8(source))
        );

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_animated_gif_preserves_frame_order() {
        let path = std::env::temp_dir().join("merkury_panel_anim_test.gif");
        let colors = [
            Rgba([255, 0, 0, 255]),
            Rgba([0, 255, 0, 255]),
            Rgba([0, 0, 255, 255]),
        ];
        {
            let file = File::create(&path).unwrap();
            let mut encoder = GifEncoder::new(file);
            encoder
                .encode_frames(
                    colors
                        .iter()
                        .map(|c| Frame::new(RgbaImage::from_pixel(16, 16, *c))),
                )
                .unwrap();
        }

        let frames = PixelGrid::load(&path).unwrap();
        assert_eq!(frames.len(), 3);

        // GIF quantization keeps single-color frames dominant per channel.
        let dominant = |grid: &PixelGrid| {
            let p = grid.get_pixel(8, 8).unwrap();
            if p.r >= p.g && p.r >= p.b {
                'r'
            } else if p.g >= p.b {
                'g'
            } else {
                'b'
            }
        };
        assert_eq!(dominant(&frames[0]), 'r');
        assert_eq!(dominant(&frames[1]), 'g');
        assert_eq!(dominant(&frames[2]), 'b');

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_rejects_missing_and_directory() {
        let missing = std::env::temp_dir().join("merkury_panel_missing_test.png");
        assert!(matches!(
            PixelGrid::load(&missing),
            Err(Error::UnreadableImage { .. })
        ));
        assert!(matches!(
            PixelGrid::load(std::env::temp_dir()),
            Err(Error::UnreadableImage { .. })
        ));
    }

    #[test]
    fn test_display_renders_grayscale_rows() {
        let mut grid = PixelGrid::new();
        grid.set_pixel(0, 0, (255, 255, 255)).unwrap();
        let rendered = format!("{grid}");
        assert!(rendered.starts_with("ff 00 "));
        assert_eq!(rendered.lines().count(), 16);
    }
}
