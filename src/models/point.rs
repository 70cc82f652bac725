/// Position of a barcode feature in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate (column along the scanned row)
    pub x: f32,
    /// Y coordinate (row number)
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Mirror the x coordinate across a row of `width` pixels
    pub fn mirror_x(&self, width: usize) -> Self {
        Self {
            x: width as f32 - self.x - 1.0,
            y: self.y,
        }
    }

    /// Map a point found on an image rotated 90° counter-clockwise back onto
    /// the original image, which was `original_width` pixels wide
    pub fn unrotate_ccw(&self, original_width: usize) -> Self {
        Self {
            x: original_width as f32 - self.y - 1.0,
            y: self.x,
        }
    }
}
