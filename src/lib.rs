//! rust_oned - multi-format 1D barcode reading
//!
//! Pure Rust decoding of Code 39, Code 128, Interleaved 2 of 5 and the
//! UPC/EAN family from single rows of pixels. A row is thresholded into a
//! [`BitArray`] and handed to a [`MultiFormatRowDecoder`], which tries each
//! registered symbology in turn and returns the first match.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Row decoders, format dispatch and decode preferences
pub mod decoder;
/// Core data structures (Barcode, BitArray, BarcodeFormat, Point)
pub mod models;
/// Whole-image row scanning
pub mod scanner;
/// Dataset and image helpers shared by the CLI and benches
pub mod tools;
/// Utility functions (grayscale, binarization, rotation)
pub mod utils;

#[cfg(test)]
mod testutil;

pub use decoder::{DecodeConfig, DecodeError, DecoderKind, MultiFormatRowDecoder, RowDecoder};
pub use models::{Barcode, BarcodeFormat, BarcodeMetadata, BitArray, Point};
pub use scanner::{GrayImage, RowScanner, ScanError, scan_batch};

use scanner::check_dimensions;
use utils::grayscale::rgb_to_grayscale;

/// Detect a barcode in an RGB image with default preferences
///
/// # Arguments
/// * `image` - Raw RGB bytes (3 bytes per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn detect(image: &[u8], width: usize, height: usize) -> Result<Barcode, ScanError> {
    detect_with_config(image, width, height, &DecodeConfig::default())
}

/// Detect a barcode in an RGB image using `config`
pub fn detect_with_config(
    image: &[u8],
    width: usize,
    height: usize,
    config: &DecodeConfig,
) -> Result<Barcode, ScanError> {
    check_dimensions(image.len(), width, height, 3)?;
    let gray = rgb_to_grayscale(image, width, height);
    RowScanner::new(config.clone()).scan(&gray, width, height)
}

/// Detect a barcode from a pre-computed grayscale image (1 byte per pixel)
pub fn detect_from_grayscale(image: &[u8], width: usize, height: usize) -> Result<Barcode, ScanError> {
    RowScanner::new(DecodeConfig::default()).scan(image, width, height)
}
