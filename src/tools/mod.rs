#![allow(clippy::items_after_test_module)]

use crate::decoder::DecodeConfig;
use crate::scanner::RowScanner;
use crate::utils::grayscale::rgb_to_grayscale;
use image::GenericImageView;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

fn max_dim_from_env() -> Option<u32> {
    env::var("ONED_MAX_DIM")
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|&v| v != 0)
}

/// Load an image as RGB bytes along with its dimensions.
///
/// Images larger than `ONED_MAX_DIM` on their longest side are downscaled.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, usize, usize), image::ImageError> {
    let img = image::open(path)?;
    let rgb = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => img
            .resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            .to_rgb8(),
        _ => img.to_rgb8(),
    };
    let (width, height) = rgb.dimensions();
    Ok((rgb.into_raw(), width as usize, height as usize))
}

/// Convert RGB bytes into grayscale.
pub fn to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    rgb_to_grayscale(rgb, width, height)
}

/// Default dataset root from environment variables.
pub fn dataset_root_from_env() -> PathBuf {
    env::var("ONED_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("benches/images/oned"))
}

/// Default bench limit from environment variables.
///
/// Returns `None` (full dataset) when `ONED_BENCH_LIMIT` is unset or `0`.
pub fn bench_limit_from_env() -> Option<usize> {
    env::var("ONED_BENCH_LIMIT")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&v| v != 0)
}

/// Smoke test flag from environment variables.
pub fn smoke_from_env() -> bool {
    matches!(
        env::var("ONED_SMOKE").as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

/// Expected barcode text for a dataset image.
///
/// Reads the label file next to the image (same stem, `.txt`) and returns its
/// first line that is neither blank nor a `#` comment, trimmed. `None` when
/// the image is unlabeled.
pub fn expected_text<P: AsRef<Path>>(image_path: P) -> Option<String> {
    let content = fs::read_to_string(image_path.as_ref().with_extension("txt")).ok()?;
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

/// Outcome of decoding a labeled dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadingRate {
    /// Images whose decoded text matched the label
    pub decoded: usize,
    /// Labeled images that loaded
    pub total: usize,
    /// Labeled images that failed to load
    pub load_failures: usize,
}

impl ReadingRate {
    /// Percentage of labeled images read correctly
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.decoded as f64 / self.total as f64 * 100.0
        }
    }
}

/// Decode every labeled image in `images` and count correct reads.
///
/// Unlabeled images are skipped. One scanner is reused for the whole run.
pub fn reading_rate<I>(images: I, config: &DecodeConfig) -> ReadingRate
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut scanner = RowScanner::new(config.clone());
    let mut rate = ReadingRate::default();

    for path in images {
        let Some(expected) = expected_text(&path) else {
            continue;
        };
        let (rgb, width, height) = match load_rgb(&path) {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to load image");
                rate.load_failures += 1;
                continue;
            }
        };
        rate.total += 1;

        let gray = to_grayscale(&rgb, width, height);
        match scanner.scan(&gray, width, height) {
            Ok(barcode) if barcode.text == expected => rate.decoded += 1,
            Ok(barcode) => {
                debug!(path = %path.display(), %expected, got = %barcode.text, "wrong text")
            }
            Err(err) => debug!(path = %path.display(), %err, "not decoded"),
        }
    }

    rate
}


/// Iterate dataset image paths with optional smoke list and limit.
pub fn dataset_iter<P: AsRef<Path>>(
    root: P,
    limit: Option<usize>,
    smoke: bool,
) -> impl Iterator<Item = PathBuf> {
    let root = root.as_ref();
    let mut images = if smoke {
        load_smoke_list(root).unwrap_or_else(|| collect_images(root))
    } else {
        collect_images(root)
    };

    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn load_smoke_list(root: &Path) -> Option<Vec<PathBuf>> {
    let contents = fs::read_to_string(root.join("_smoke.txt")).ok()?;
    let paths: Vec<PathBuf> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| root.join(line))
        .filter(|path| path.exists())
        .collect();
    if paths.is_empty() { None } else { Some(paths) }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for path in entries.flatten().map(|entry| entry.path()) {
            if path.is_dir() {
                stack.push(path);
            } else if is_image(&path) {
                images.push(path);
            }
        }
    }

    images
}
