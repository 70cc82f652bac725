//! Image helpers feeding the row scanner
//!
//! - Grayscale conversion (RGB/RGBA to luminance)
//! - Global (Otsu) thresholding of rows into bit arrays
//! - Counter-clockwise rotation for try-harder scans

pub mod binarization;
pub mod geometry;
pub mod grayscale;
