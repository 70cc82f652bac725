//! Row scanning over a whole grayscale image
//!
//! Rows are visited from the middle of the image outwards. Each row is tried
//! as read and then reversed, so symbols printed upside down are found too.
//! With try-harder enabled every row is visited and, if that fails, the image
//! is rotated 90° counter-clockwise and scanned again.

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, trace};

use crate::decoder::config::max_scan_lines;
use crate::decoder::{DecodeConfig, MultiFormatRowDecoder, RowDecoder};
use crate::models::{Barcode, BitArray};
use crate::utils::binarization::{binarize_row, otsu_threshold};
use crate::utils::geometry::rotate_ccw;

/// Why an image scan produced no barcode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The pixel buffer does not hold `width * height` samples
    #[error("buffer of {len} bytes does not match a {width}x{height} image")]
    InvalidDimensions {
        /// Image width in pixels
        width: usize,
        /// Image height in pixels
        height: usize,
        /// Buffer length in bytes
        len: usize,
    },
    /// No row decoded on any visited row or orientation
    #[error("no barcode found")]
    NotFound,
}

/// Borrowed grayscale image, one byte per pixel
#[derive(Debug, Clone, Copy)]
pub struct GrayImage<'a> {
    /// Row-major luminance values
    pub pixels: &'a [u8],
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl<'a> GrayImage<'a> {
    /// Wrap a grayscale buffer
    pub fn new(pixels: &'a [u8], width: usize, height: usize) -> Self {
        Self { pixels, width, height }
    }
}

/// Check that `len` bytes hold a `width` x `height` image with `channels`
/// bytes per pixel
pub(crate) fn check_dimensions(
    len: usize,
    width: usize,
    height: usize,
    channels: usize,
) -> Result<(), ScanError> {
    let expected = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(channels));
    if width == 0 || height == 0 || expected != Some(len) {
        return Err(ScanError::InvalidDimensions { width, height, len });
    }
    Ok(())
}

/// Scans images row by row with one [`MultiFormatRowDecoder`]
///
/// A scanner is not shared between threads; create one per worker.
pub struct RowScanner {
    config: DecodeConfig,
    decoder: MultiFormatRowDecoder,
    row: BitArray,
    reversed: BitArray,
}

impl RowScanner {
    /// Create a scanner whose decoder registry is built from `config`
    pub fn new(config: DecodeConfig) -> Self {
        let decoder = MultiFormatRowDecoder::new(Some(&config));
        Self {
            config,
            decoder,
            row: BitArray::default(),
            reversed: BitArray::default(),
        }
    }

    /// Preferences this scanner was built with
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Scan a grayscale image for a single barcode
    pub fn scan(&mut self, gray: &[u8], width: usize, height: usize) -> Result<Barcode, ScanError> {
        check_dimensions(gray.len(), width, height, 1)?;
        self.decoder.reset();

        let threshold = otsu_threshold(gray);
        trace!(width, height, threshold, "scanning image");

        if let Some(barcode) = self.scan_rows(gray, width, height, threshold) {
            return Ok(barcode);
        }

        if self.config.try_harder {
            debug!("no barcode on upright image, retrying rotated");
            let rotated = rotate_ccw(gray, width, height);
            if let Some(mut barcode) = self.scan_rows(&rotated, height, width, threshold) {
                let orientation = barcode.metadata.orientation.unwrap_or(0);
                barcode.metadata.orientation = Some((orientation + 270) % 360);
                barcode.points = barcode
                    .points
                    .iter()
                    .map(|p| p.unrotate_ccw(width))
                    .collect();
                return Ok(barcode);
            }
        }

        Err(ScanError::NotFound)
    }

    /// Scan a borrowed [`GrayImage`]
    pub fn scan_image(&mut self, image: GrayImage<'_>) -> Result<Barcode, ScanError> {
        self.scan(image.pixels, image.width, image.height)
    }

    fn scan_rows(&mut self, gray: &[u8], width: usize, height: usize, threshold: u8) -> Option<Barcode> {
        let try_harder = self.config.try_harder;
        let row_step = (height >> if try_harder { 8 } else { 5 }).max(1);
        let max_lines = if try_harder { height } else { max_scan_lines() };
        let middle = height / 2;

        for x in 0..max_lines {
            // Alternate below and above the middle, one step further each pair
            let offset = row_step * x.div_ceil(2);
            let row_number = if x % 2 == 0 {
                middle + offset
            } else {
                match middle.checked_sub(offset) {
                    Some(row_number) => row_number,
                    None => break,
                }
            };
            if row_number >= height {
                break;
            }
            let Some(pixels) = gray.get(row_number * width..(row_number + 1) * width) else {
                break;
            };
            binarize_row(pixels, threshold, &mut self.row);

            if let Ok(barcode) = self.decoder.decode_row(row_number, &self.row, &self.config) {
                debug!(row = row_number, format = %barcode.format, "decoded row");
                return Some(barcode);
            }

            self.row.reverse_into(&mut self.reversed);
            if let Ok(mut barcode) = self.decoder.decode_row(row_number, &self.reversed, &self.config) {
                debug!(row = row_number, format = %barcode.format, "decoded reversed row");
                barcode.metadata.orientation = Some(180);
                barcode.points = barcode.points.iter().map(|p| p.mirror_x(width)).collect();
                return Some(barcode);
            }
            trace!(row = row_number, "no barcode on row");
        }
        None
    }
}

/// Scan many grayscale images in parallel, one scanner per rayon worker
///
/// Results keep the order of `images`.
pub fn scan_batch(images: &[GrayImage<'_>], config: &DecodeConfig) -> Vec<Result<Barcode, ScanError>> {
    images
        .par_iter()
        .map_init(
            || RowScanner::new(config.clone()),
            |scanner, image| scanner.scan_image(*image),
        )
        .collect()
}
