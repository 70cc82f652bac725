//! RGB/RGBA to luminance
//!
//! Y = 0.299*R + 0.587*G + 0.114*B, computed as (76*R + 150*G + 29*B) >> 8.

use rayon::prelude::*;

const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

/// Images at least this many pixels are converted on the rayon pool
const PARALLEL_MIN_PIXELS: usize = 512 * 512;

#[inline]
fn luminance(px: &[u8]) -> u8 {
    let lum = (COEF_R * px[0] as u32 + COEF_G * px[1] as u32 + COEF_B * px[2] as u32) >> 8;
    lum.min(255) as u8
}

fn convert_into(pixels: &[u8], channels: usize, output: &mut [u8]) -> usize {
    let mut written = 0;
    for (out, px) in output.iter_mut().zip(pixels.chunks_exact(channels)) {
        *out = luminance(px);
        written += 1;
    }
    written
}

fn convert(pixels: &[u8], channels: usize, width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }
    if width * height >= PARALLEL_MIN_PIXELS {
        gray.par_chunks_mut(width)
            .zip(pixels.par_chunks(width * channels))
            .for_each(|(row, src)| {
                convert_into(src, channels, row);
            });
    } else {
        convert_into(pixels, channels, &mut gray);
    }
    gray
}

/// Convert RGB bytes to grayscale, one byte per pixel
///
/// Pixels missing from a short input buffer stay black.
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(rgb, 3, width, height)
}

/// Convert RGBA bytes to grayscale (alpha ignored)
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(rgba, 4, width, height)
}

/// Convert RGB bytes into a caller-provided buffer, returning pixels written
pub fn rgb_to_grayscale_into(rgb: &[u8], output: &mut [u8]) -> usize {
    convert_into(rgb, 3, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_grayscale() {
        let gray = rgb_to_grayscale(&[255, 255, 255], 1, 1);
        assert!(gray[0] >= 254);

        let gray = rgb_to_grayscale(&[0, 0, 0], 1, 1);
        assert_eq!(gray[0], 0);

        let red = rgb_to_grayscale(&[255, 0, 0], 1, 1)[0];
        let green = rgb_to_grayscale(&[0, 255, 0], 1, 1)[0];
        assert!(red > 0 && red < 255);
        assert!(green > red);

        let img = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        assert_eq!(rgb_to_grayscale(&img, 2, 2).len(), 4);
    }

    #[test]
    fn test_rgba_ignores_alpha() {
        let opaque = rgba_to_grayscale(&[255, 128, 64, 255], 1, 1);
        let clear = rgba_to_grayscale(&[255, 128, 64, 0], 1, 1);
        assert_eq!(opaque, clear);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let (width, height) = (640, 480);
        let rgb: Vec<u8> = (0..width * height * 3).map(|i| (i * 7 % 251) as u8).collect();
        let parallel = rgb_to_grayscale(&rgb, width, height);
        let mut serial = vec![0u8; width * height];
        assert_eq!(rgb_to_grayscale_into(&rgb, &mut serial), width * height);
        assert_eq!(parallel, serial);
    }
}
