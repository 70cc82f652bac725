use super::{
    FIRST_DIGIT_ENCODINGS, L_AND_G_PATTERNS, L_PATTERNS, MIDDLE_PATTERN, UpcEanReader,
    decode_digit, decode_standalone, find_guard_pattern,
};
use crate::decoder::config::DecodeConfig;
use crate::decoder::error::DecodeError;
use crate::decoder::row_decoder::RowDecoder;
use crate::models::{Barcode, BarcodeFormat, BitArray};

/// EAN-13 decoder
///
/// The thirteenth digit is not drawn; it is implied by the parity pattern of
/// the six left-hand digits.
#[derive(Debug, Default)]
pub struct Ean13Reader {
    counters: [usize; 4],
}

impl Ean13Reader {
    /// Create a reader
    pub fn new() -> Self {
        Self::default()
    }
}

fn determine_first_digit(result: &mut String, lg_pattern_found: u8) -> Result<(), DecodeError> {
    let digit = FIRST_DIGIT_ENCODINGS
        .iter()
        .position(|&encoding| encoding == lg_pattern_found)
        .ok_or(DecodeError::NotFound)?;
    result.insert(0, char::from(b'0' + digit as u8));
    Ok(())
}

impl UpcEanReader for Ean13Reader {
    fn format(&self) -> BarcodeFormat {
        BarcodeFormat::Ean13
    }

    fn decode_middle(
        &mut self,
        row: &BitArray,
        start_range: (usize, usize),
        result: &mut String,
    ) -> Result<usize, DecodeError> {
        let end = row.len();
        let mut row_offset = start_range.1;
        let mut lg_pattern_found = 0u8;

        for x in 0..6 {
            if row_offset >= end {
                break;
            }
            let best_match = decode_digit(row, &mut self.counters, row_offset, &L_AND_G_PATTERNS)?;
            result.push(char::from(b'0' + (best_match % 10) as u8));
            row_offset += self.counters.iter().sum::<usize>();
            if best_match >= 10 {
                lg_pattern_found |= 1 << (5 - x);
            }
        }

        determine_first_digit(result, lg_pattern_found)?;

        let middle_range = find_guard_pattern(row, row_offset, true, &MIDDLE_PATTERN)?;
        row_offset = middle_range.1;

        for _ in 0..6 {
            if row_offset >= end {
                break;
            }
            let best_match = decode_digit(row, &mut self.counters, row_offset, &L_PATTERNS)?;
            result.push(char::from(b'0' + best_match as u8));
            row_offset += self.counters.iter().sum::<usize>();
        }

        Ok(row_offset)
    }

    fn reset(&mut self) {
        self.counters = [0; 4];
    }
}

impl RowDecoder for Ean13Reader {
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
