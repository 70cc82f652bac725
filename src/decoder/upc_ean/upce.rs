use super::{
    END_PATTERN_UPCE, L_AND_G_PATTERNS, NUMSYS_AND_CHECK_DIGIT_PATTERNS, UpcEanReader,
    check_standard_checksum, decode_digit, decode_standalone, find_guard_pattern,
};
use crate::decoder::config::DecodeConfig;
use crate::decoder::error::DecodeError;
use crate::decoder::row_decoder::RowDecoder;
use crate::models::{Barcode, BarcodeFormat, BitArray};

/// UPC-E decoder
///
/// Six drawn digits; the number system and check digit are implied by their
/// parity. Results are reported in the 8-digit UPC-E form.
#[derive(Debug, Default)]
pub struct UpcEReader {
    counters: [usize; 4],
}

impl UpcEReader {
    /// Create a reader
    pub fn new() -> Self {
        Self::default()
    }
}

fn determine_num_sys_and_check_digit(result: &mut String, lg_pattern_found: u8) -> Result<(), DecodeError> {
    for (num_sys, patterns) in NUMSYS_AND_CHECK_DIGIT_PATTERNS.iter().enumerate() {
        if let Some(d) = patterns.iter().position(|&p| p == lg_pattern_found) {
            result.insert(0, char::from(b'0' + num_sys as u8));
            result.push(char::from(b'0' + d as u8));
            return Ok(());
        }
    }
    Err(DecodeError::NotFound)
}

/// Expand an 8-digit UPC-E string (or the 7 digits without the check digit)
/// to the equivalent UPC-A string
///
/// Input that is shorter than 7 characters or not all ASCII digits is
/// returned unchanged.
pub fn convert_upce_to_upca(upce: &str) -> String {
    let bytes = upce.as_bytes();
    if bytes.len() < 7 || !bytes.iter().all(u8::is_ascii_digit) {
        return upce.to_string();
    }
    let chars = &upce[1..7];
    let mut result = String::with_capacity(12);
    result.push_str(&upce[..1]);
    let last = bytes[6];
    match last {
        b'0' | b'1' | b'2' => {
            result.push_str(&chars[..2]);
            result.push(char::from(last));
            result.push_str("0000");
            result.push_str(&chars[2..5]);
        }
        b'3' => {
            result.push_str(&chars[..3]);
            result.push_str("00000");
            result.push_str(&chars[3..5]);
        }
        b'4' => {
            result.push_str(&chars[..4]);
            result.push_str("00000");
            result.push_str(&chars[4..5]);
        }
        _ => {
            result.push_str(&chars[..5]);
            result.push_str("0000");
            result.push(char::from(last));
        }
    }
    if bytes.len() >= 8 {
        result.push_str(&upce[7..8]);
    }
    result
}

impl UpcEanReader for UpcEReader {
    fn format(&self) -> BarcodeFormat {
        BarcodeFormat::UpcE
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

        determine_num_sys_and_check_digit(result, lg_pattern_found)?;
        Ok(row_offset)
    }

    fn decode_end(&mut self, row: &BitArray, end_start: usize) -> Result<(usize, usize), DecodeError> {
        find_guard_pattern(row, end_start, true, &END_PATTERN_UPCE)
    }

    fn check_checksum(&self, text: &str) -> Result<bool, DecodeError> {
        if !text.is_ascii() {
            return Err(DecodeError::Format);
        }
        check_standard_checksum(&convert_upce_to_upca(text))
    }

    fn reset(&mut self) {
        self.counters = [0; 4];
    }
}

impl RowDecoder for UpcEReader {
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
