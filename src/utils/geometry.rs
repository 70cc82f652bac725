//! Image rotation used by try-harder scanning

/// Rotate a grayscale image 90 degrees counter-clockwise
///
/// The result is `height` pixels wide and `width` pixels high; rotated pixel
/// `(rx, ry)` comes from original pixel `(width - 1 - ry, rx)`, which
/// [`Point::unrotate_ccw`](crate::models::Point::unrotate_ccw) inverts.
pub fn rotate_ccw(gray: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut rotated = vec![0u8; width * height];
    for (ry, out_row) in rotated.chunks_exact_mut(height.max(1)).enumerate().take(width) {
        let x = width - 1 - ry;
        for (rx, out) in out_row.iter_mut().enumerate() {
            *out = gray.get(rx * width + x).copied().unwrap_or(0);
        }
    }
    rotated
}
