use super::{BarcodeFormat, Point};

/// Optional facts a decoder or the scanner attaches to a result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarcodeMetadata {
    /// AIM symbology identifier, e.g. `]C0` for plain Code 128
    pub symbology_identifier: Option<String>,
    /// Clockwise rotation in degrees at which the symbol was read
    pub orientation: Option<u16>,
}

/// Barcode decoded from a single row
#[derive(Debug, Clone, PartialEq)]
pub struct Barcode {
    /// Symbology that produced the result
    pub format: BarcodeFormat,
    /// Decoded payload text
    pub text: String,
    /// Raw code values where the symbology exposes them
    pub raw_bytes: Option<Vec<u8>>,
    /// Start and end of the symbol on the row, in image coordinates
    pub points: Vec<Point>,
    /// Row number the symbol was read from
    pub row: usize,
    /// Extra result facts
    pub metadata: BarcodeMetadata,
}

impl Barcode {
    /// Create a result spanning `left..right` on `row`
    pub fn new(format: BarcodeFormat, text: String, row: usize, left: f32, right: f32) -> Self {
        let y = row as f32;
        Self {
            format,
            text,
            raw_bytes: None,
            points: vec![Point::new(left, y), Point::new(right, y)],
            row,
            metadata: BarcodeMetadata::default(),
        }
    }

    /// Attach raw code values
    pub fn with_raw_bytes(mut self, raw: Vec<u8>) -> Self {
        self.raw_bytes = Some(raw);
        self
    }

    /// Attach an AIM symbology identifier
    pub fn with_symbology_identifier(mut self, id: impl Into<String>) -> Self {
        self.metadata.symbology_identifier = Some(id.into());
        self
    }
}
