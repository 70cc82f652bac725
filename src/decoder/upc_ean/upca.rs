use super::{Ean13Reader, UpcEanReader, decode_standalone};
use crate::decoder::config::DecodeConfig;
use crate::decoder::error::DecodeError;
use crate::decoder::row_decoder::RowDecoder;
use crate::models::{Barcode, BarcodeFormat, BitArray};

/// UPC-A decoder
///
/// A UPC-A symbol is an EAN-13 symbol whose implied first digit is `0`.
#[derive(Debug, Default)]
pub struct UpcAReader {
    ean13: Ean13Reader,
}

impl UpcAReader {
    /// Create a reader
    pub fn new() -> Self {
        Self::default()
    }
}

/// Re-label an EAN-13 result with a leading zero as UPC-A
pub(crate) fn ean13_to_upca(barcode: Barcode) -> Result<Barcode, DecodeError> {
    match barcode.text.strip_prefix('0') {
        Some(rest) => Ok(Barcode {
            format: BarcodeFormat::UpcA,
            text: rest.to_string(),
            ..barcode
        }),
        None => Err(DecodeError::Format),
    }
}

impl UpcEanReader for UpcAReader {
    fn format(&self) -> BarcodeFormat {
        BarcodeFormat::UpcA
    }

    fn decode_middle(
        &mut self,
        row: &BitArray,
        start_range: (usize, usize),
        result: &mut String,
    ) -> Result<usize, DecodeError> {
        self.ean13.decode_middle(row, start_range, result)
    }

    fn decode_row_with_start(
        &mut self,
        row_number: usize,
        row: &BitArray,
        start_range: (usize, usize),
    ) -> Result<Barcode, DecodeError> {
        let barcode = self.ean13.decode_row_with_start(row_number, row, start_range)?;
        ean13_to_upca(barcode)
    }

    fn reset(&mut self) {
        UpcEanReader::reset(&mut self.ean13);
    }
}

impl RowDecoder for UpcAReader {
    fn decode_row(
        &mut self,
        row_number: usize,
        row: &BitArray,
        _config: &DecodeConfig,
    ) -> Result<Barcode, DecodeError> {
        decode_standalone(self, row_number, row)
    }

    fn reset(&mut self) {
        UpcEanReader::reset(self);
    }
}
