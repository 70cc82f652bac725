use crate::models::BitArray;

/// Otsu's optimal global threshold; pixels below it are black
pub fn otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total_pixels = gray.len() as f64;
    let total_sum: u64 = histogram
        .iter()
        .enumerate()
        .map(|(intensity, &count)| intensity as u64 * count)
        .sum();

    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;
    let mut class1_pixels = 0u64;
    let mut class1_sum = 0u64;

    for threshold in 1..=255usize {
        // Class 1 is every intensity below `threshold`
        class1_pixels += histogram[threshold - 1];
        class1_sum += (threshold as u64 - 1) * histogram[threshold - 1];
        let class2_pixels = gray.len() as u64 - class1_pixels;
        if class1_pixels == 0 || class2_pixels == 0 {
            continue;
        }

        let class1_mean = class1_sum as f64 / class1_pixels as f64;
        let class2_mean = (total_sum - class1_sum) as f64 / class2_pixels as f64;
        let weight1 = class1_pixels as f64 / total_pixels;
        let weight2 = class2_pixels as f64 / total_pixels;
        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}

/// Threshold one row of grayscale pixels into `out`, resizing it to fit
pub fn binarize_row(pixels: &[u8], threshold: u8, out: &mut BitArray) {
    if out.len() != pixels.len() {
        *out = BitArray::new(pixels.len());
    } else {
        out.clear();
    }
    for (x, &pixel) in pixels.iter().enumerate() {
        if pixel < threshold {
            out.set(x, true);
        }
    }
}
