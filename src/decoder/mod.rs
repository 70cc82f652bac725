//! 1D barcode row decoding
//!
//! - Per-symbology readers (Code 39, Code 128, ITF, UPC/EAN family)
//! - The [`RowDecoder`](row_decoder::RowDecoder) capability they share
//! - Format dispatch over an ordered registry of readers

/// Code 128 reader
pub mod code128;
/// Code 39 reader
pub mod code39;
/// Decode preferences and environment knobs
pub mod config;
/// Decode error kinds
pub mod error;
/// Interleaved 2 of 5 reader
pub mod itf;
/// Registry builder and dispatch loop
pub mod multi_format;
/// Row decoder trait and run-length helpers
pub mod row_decoder;
/// UPC/EAN family readers
pub mod upc_ean;

pub use code39::Code39Reader;
pub use code128::Code128Reader;
pub use config::{DEFAULT_ITF_LENGTHS, DecodeConfig};
pub use error::DecodeError;
pub use itf::ItfReader;
pub use multi_format::{DecoderKind, MultiFormatRowDecoder};
pub use row_decoder::RowDecoder;
