use thiserror::Error;

/// Why a row decode attempt did not produce a barcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No symbol of the decoder's format was found on the row
    #[error("barcode not found")]
    NotFound,
    /// A symbol was read but its check character did not verify
    #[error("checksum mismatch")]
    Checksum,
    /// A symbol was read but violates the format's structure rules
    #[error("malformed barcode")]
    Format,
}
