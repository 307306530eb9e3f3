//! High-dynamic-range images: the render target and the texture source.
//!
//! Provides the PFM codec, the tone-mapping pipeline used before LDR export
//! (`normalize_image` then `clamp_image`), and texture loading from either
//! PFM or any 8-bit format the `image` crate decodes.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::color::{Color, BLACK};

/// Errors raised while decoding a PFM stream.
#[derive(Error, Debug)]
pub enum PfmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid magic in PFM file: expected \"PF\", found {0:?}")]
    InvalidMagic(String),

    #[error("invalid image size specification: {0:?}")]
    InvalidSize(String),

    #[error("invalid endianness specification: {0:?}")]
    InvalidEndianness(String),

    #[error("impossible to read binary data from the file")]
    Truncated,
}

pub type PfmResult<T> = Result<T, PfmError>;

/// Errors raised while loading or saving an image file.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid PFM file {path}: {source}")]
    Pfm {
        path: String,
        #[source]
        source: PfmError,
    },

    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image {0} has no pixels")]
    Empty(String),
}

pub type ImageResult<T> = Result<T, ImageError>;

/// Byte order of the floats in a PFM file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    LittleEndian,
    BigEndian,
}

impl Endianness {
    fn header_value(self) -> &'static str {
        match self {
            Endianness::LittleEndian => "-1.0",
            Endianness::BigEndian => "1.0",
        }
    }
}

/// A 2D matrix of [`Color`]s stored row by row.
///
/// Pixel `(0, 0)` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct HdrImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}

impl HdrImage {
    /// Create a black image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![BLACK; width * height],
        }
    }

    /// Aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn valid_coordinates(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Position of pixel `(x, y)` in [`HdrImage::pixels`].
    #[inline]
    pub fn pixel_offset(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Panics if `(x, y)` lies outside the image.
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        assert!(
            self.valid_coordinates(x, y),
            "pixel ({x}, {y}) outside a {}x{} image",
            self.width,
            self.height
        );
        self.pixels[self.pixel_offset(x, y)]
    }

    /// Panics if `(x, y)` lies outside the image.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        assert!(
            self.valid_coordinates(x, y),
            "pixel ({x}, {y}) outside a {}x{} image",
            self.width,
            self.height
        );
        let offset = self.pixel_offset(x, y);
        self.pixels[offset] = color;
    }

    /// Write the image as PFM: rows bottom to top, left to right.
    pub fn write_pfm<W: Write>(&self, stream: &mut W, endianness: Endianness) -> std::io::Result<()> {
        let header = format!(
            "PF\n{} {}\n{}\n",
            self.width,
            self.height,
            endianness.header_value()
        );
        stream.write_all(header.as_bytes())?;

        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let color = self.get_pixel(x, y);
                for value in [color.r, color.g, color.b] {
                    let value = value as f32;
                    let bytes = match endianness {
                        Endianness::LittleEndian => value.to_le_bytes(),
                        Endianness::BigEndian => value.to_be_bytes(),
                    };
                    stream.write_all(&bytes)?;
                }
            }
        }

        Ok(())
    }

    /// Decode a PFM stream.
    pub fn read_pfm<R: BufRead>(stream: &mut R) -> PfmResult<Self> {
        let magic = read_line(stream)?;
        if magic != "PF" {
            return Err(PfmError::InvalidMagic(magic));
        }

        let (width, height) = parse_img_size(&read_line(stream)?)?;
        let endianness = parse_endianness(&read_line(stream)?)?;

        // Grown as pixels arrive, never sized from the header alone
        let mut file_order = Vec::new();
        for _ in 0..width * height {
            let r = read_float(stream, endianness)?;
            let g = read_float(stream, endianness)?;
            let b = read_float(stream, endianness)?;
            file_order.push(Color::new(r, g, b));
        }

        let pixels = file_order
            .chunks_exact(width)
            .rev()
            .flatten()
            .copied()
            .collect();

        Ok(HdrImage {
            width,
            height,
            pixels,
        })
    }

    /// Write a PFM file (little endian).
    pub fn save_pfm(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        let path = path.as_ref();
        let io_err = |source| ImageError::Io {
            path: path.display().to_string(),
            source,
        };

        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        self.write_pfm(&mut writer, Endianness::LittleEndian)
            .and_then(|_| writer.flush())
            .map_err(io_err)?;

        log::debug!("Wrote {}x{} PFM to {}", self.width, self.height, path.display());
        Ok(())
    }

    /// Load an image from disk.
    ///
    /// `.pfm` files are read as-is (linear radiance). Any other format is
    /// decoded by the `image` crate and its sRGB bytes converted to linear
    /// values in `[0, 1]`.
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let is_pfm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pfm"));

        let image = if is_pfm {
            let file = File::open(path).map_err(|source| ImageError::Io {
                path: path.display().to_string(),
                source,
            })?;
            HdrImage::read_pfm(&mut BufReader::new(file)).map_err(|source| ImageError::Pfm {
                path: path.display().to_string(),
                source,
            })?
        } else {
            let rgb = image::open(path)?.to_rgb8();
            let (width, height) = rgb.dimensions();
            if width == 0 || height == 0 {
                return Err(ImageError::Empty(path.display().to_string()));
            }
            let pixels = rgb
                .pixels()
                .map(|p| {
                    Color::new(
                        srgb_to_linear(p[0]),
                        srgb_to_linear(p[1]),
                        srgb_to_linear(p[2]),
                    )
                })
                .collect();

            HdrImage {
                width: width as usize,
                height: height as usize,
                pixels,
            }
        };

        log::debug!(
            "Loaded image: {} ({}x{}, {:.1} KB)",
            path.display(),
            image.width,
            image.height,
            (image.pixels.len() * std::mem::size_of::<Color>()) as f64 / 1024.0
        );

        Ok(image)
    }

    /// Logarithmic mean of the pixel luminosities.
    ///
    /// `delta` keeps black pixels from sending the logarithm to -inf.
    pub fn average_luminosity(&self, delta: f64) -> f64 {
        let cumsum: f64 = self
            .pixels
            .iter()
            .map(|pix| (delta + pix.luminosity()).log10())
            .sum();

        10f64.powf(cumsum / self.pixels.len() as f64)
    }

    /// Scale every pixel by `factor / luminosity`.
    ///
    /// With `None` the luminosity is `average_luminosity(1e-10)`.
    pub fn normalize_image(&mut self, factor: f64, luminosity: Option<f64>) {
        let luminosity = luminosity.unwrap_or_else(|| self.average_luminosity(1e-10));
        let scale = factor / luminosity;

        for pixel in &mut self.pixels {
            *pixel = *pixel * scale;
        }
    }

    /// Map every channel into `[0, 1)` with `x / (1 + x)`.
    pub fn clamp_image(&mut self) {
        for pixel in &mut self.pixels {
            pixel.r = clamp(pixel.r);
            pixel.g = clamp(pixel.g);
            pixel.b = clamp(pixel.b);
        }
    }

    /// Save an 8-bit image, the format chosen from the file extension.
    ///
    /// Each channel becomes `255 * c^(1/gamma)`. Tone-map the image first so
    /// that every channel is in `[0, 1]`; values outside saturate.
    pub fn write_ldr_image(&self, path: impl AsRef<Path>, gamma: f64) -> ImageResult<()> {
        let path = path.as_ref();
        if image::ImageFormat::from_path(path).is_err() {
            return Err(ImageError::UnsupportedFormat(path.display().to_string()));
        }

        let inv_gamma = 1.0 / gamma;
        let to_byte = |c: f64| (255.0 * c.powf(inv_gamma)) as u8;

        let img = image::RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let color = self.get_pixel(x as usize, y as usize);
            image::Rgb([to_byte(color.r), to_byte(color.g), to_byte(color.b)])
        });
        img.save(path)?;

        log::debug!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[inline]
fn clamp(x: f64) -> f64 {
    x / (1.0 + x)
}

/// Convert an sRGB byte to a linear value.
pub fn srgb_to_linear(value: u8) -> f64 {
    let v = value as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Read bytes up to `\n` or the end of the stream, without the newline.
fn read_line<R: BufRead>(stream: &mut R) -> PfmResult<String> {
    let mut buf = Vec::new();
    stream.read_until(b'\n', &mut buf)?;
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn parse_img_size(line: &str) -> PfmResult<(usize, usize)> {
    let elements: Vec<&str> = line.split(' ').collect();
    if elements.len() != 2 {
        return Err(PfmError::InvalidSize(line.to_string()));
    }

    let invalid = || PfmError::InvalidSize(line.to_string());
    let width = elements[0].parse::<usize>().map_err(|_| invalid())?;
    let height = elements[1].parse::<usize>().map_err(|_| invalid())?;

    // Three 4-byte floats per pixel must fit in memory addressing
    let byte_len = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3 * std::mem::size_of::<f32>()));
    if width == 0 || height == 0 || byte_len.is_none() {
        return Err(invalid());
    }

    Ok((width, height))
}

fn parse_endianness(line: &str) -> PfmResult<Endianness> {
    let value = line
        .trim()
        .parse::<f64>()
        .map_err(|_| PfmError::InvalidEndianness(line.to_string()))?;

    if value == 1.0 {
        Ok(Endianness::BigEndian)
    } else if value == -1.0 {
        Ok(Endianness::LittleEndian)
    } else {
        Err(PfmError::InvalidEndianness(line.to_string()))
    }
}

fn read_float<R: Read>(stream: &mut R, endianness: Endianness) -> PfmResult<f64> {
    let mut bytes = [0u8; 4];
    stream.read_exact(&mut bytes).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => PfmError::Truncated,
        _ => PfmError::Io(e),
    })?;

    let value = match endianness {
        Endianness::LittleEndian => f32::from_le_bytes(bytes),
        Endianness::BigEndian => f32::from_be_bytes(bytes),
    };
    Ok(value as f64)
}
