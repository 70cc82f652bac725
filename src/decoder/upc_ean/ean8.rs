use super::{L_PATTERNS, MIDDLE_PATTERN, UpcEanReader, decode_digit, decode_standalone, find_guard_pattern};
use crate::decoder::config::DecodeConfig;
use crate::decoder::error::DecodeError;
use crate::decoder::row_decoder::RowDecoder;
use crate::models::{Barcode, BarcodeFormat, BitArray};

/// EAN-8 decoder: four odd-parity digits on each side of the middle guard
#[derive(Debug, Default)]
pub struct Ean8Reader {
    counters: [usize; 4],
}

impl Ean8Reader {
    /// Create a reader
    pub fn new() -> Self {
        Self::default()
    }

    fn decode_half(
        &mut self,
        row: &BitArray,
        mut row_offset: usize,
        result: &mut String,
    ) -> Result<usize, DecodeError> {
        let end = row.len();
        for _ in 0..4 {
            if row_offset >= end {
                break;
            }
            let best_match = decode_digit(row, &mut self.counters, row_offset, &L_PATTERNS)?;
            result.push(char::from(b'0' + best_match as u8));
            row_offset += self.counters.iter().sum::<usize>();
        }
        Ok(row_offset)
    }
}

impl UpcEanReader for Ean8Reader {
    fn format(&self) -> BarcodeFormat {
        BarcodeFormat::Ean8
    }

    fn decode_middle(
        &mut self,
        row: &BitArray,
        start_range: (usize, usize),
        result: &mut String,
    ) -> Result<usize, DecodeError> {
        let row_offset = self.decode_half(row, start_range.1, result)?;
        let middle_range = find_guard_pattern(row, row_offset, true, &MIDDLE_PATTERN)?;
        self.decode_half(row, middle_range.1, result)
    }

    fn reset(&mut self) {
        self.counters = [0; 4];
    }
}

impl RowDecoder for Ean8Reader {
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
