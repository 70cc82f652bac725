pub mod barcode;
pub mod bit_array;
pub mod format;
pub mod point;

pub use barcode::{Barcode, BarcodeMetadata};
pub use bit_array::BitArray;
pub use format::{BarcodeFormat, UnknownFormat};
pub use point::Point;
