//! Image buffer adapter: container decode, bounded downscaling, re-encode.
//!
//! Every input is normalized to a canonical RGB8 pixel buffer before any
//! transform runs; container parsing and resampling are delegated to the
//! `image` crate.

use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageEncoder, ImageError, RgbImage};

use crate::error::{Result, VeilError};

/// Samples per pixel in the canonical buffer (RGB, alpha dropped at decode).
pub const CHANNELS: u32 = 3;

/// Quality used for JPEG output.
const JPEG_QUALITY: u8 = 90;

/// Output container format for re-encoded images.
///
/// JPEG is lossy: writing cipher output as JPEG destroys the exact sample
/// values the inverse transform needs, so a ciphered image saved as JPEG is
/// unrecoverable. The contract permits it; callers choose it at their own
/// risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless PNG.
    Png,
    /// JPEG at quality 90.
    Jpeg,
}

impl OutputFormat {
    /// Whether the container preserves sample values exactly.
    pub fn is_lossless(self) -> bool {
        matches!(self, Self::Png)
    }
}

impl FromStr for OutputFormat {
    type Err = VeilError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(VeilError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Canonical decoded image: `width * height * CHANNELS` sample bytes in
/// row-major order. Dimensions and layout are preserved end-to-end within
/// one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub(crate) fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * CHANNELS as usize);
        Self { width, height, data }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of sample bytes.
    pub fn sample_count(&self) -> usize {
        self.data.len()
    }

    /// Raw samples, row-major RGB.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Decode arbitrary container bytes into a canonical pixel buffer.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes).map_err(map_image_err)?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(PixelBuffer {
        width,
        height,
        data: rgb.into_raw(),
    })
}

/// Cap the larger side at `bound`, preserving aspect ratio.
///
/// No-op when unbounded or already small enough. New dimensions are
/// `side * bound / max(width, height)` floored, never below one pixel, and
/// the scaling math is pure integer arithmetic so the same bound always
/// produces the same dimensions. Resampling uses Lanczos3 and is lossy:
/// for the cipher path the bound is applied once, on the encode side, and
/// the recorded output dimensions carry it from then on.
pub fn resize_bound(buffer: PixelBuffer, bound: Option<u32>) -> PixelBuffer {
    let Some(max_side) = bound else {
        return buffer;
    };
    let largest = buffer.width.max(buffer.height);
    if largest <= max_side {
        return buffer;
    }

    let new_w = ((buffer.width as u64 * max_side as u64) / largest as u64).max(1) as u32;
    let new_h = ((buffer.height as u64 * max_side as u64) / largest as u64).max(1) as u32;

    let img = RgbImage::from_raw(buffer.width, buffer.height, buffer.data)
        .expect("pixel buffer length matches its dimensions");
    let resized = image::imageops::resize(&img, new_w, new_h, FilterType::Lanczos3);

    PixelBuffer {
        width: new_w,
        height: new_h,
        data: resized.into_raw(),
    }
}

/// Re-encode a pixel buffer into the requested container format.
pub fn encode(buffer: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        OutputFormat::Png => PngEncoder::new(&mut out)
            .write_image(&buffer.data, buffer.width, buffer.height, ExtendedColorType::Rgb8)
            .map_err(map_image_err)?,
        OutputFormat::Jpeg => JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
            .write_image(&buffer.data, buffer.width, buffer.height, ExtendedColorType::Rgb8)
            .map_err(map_image_err)?,
    }
    Ok(out)
}

fn map_image_err(err: ImageError) -> VeilError {
    match err {
        ImageError::Unsupported(e) => VeilError::UnsupportedFormat(e.to_string()),
        other => VeilError::CorruptImage(other.to_string()),
    }
}
