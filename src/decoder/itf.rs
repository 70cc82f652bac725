//! Interleaved 2 of 5 row decoder
//!
//! Digits come in pairs: the first digit is carried by five bars, the second
//! by the five spaces interleaved with them. Two of each five are wide.

use crate::decoder::config::DecodeConfig;
use crate::decoder::error::DecodeError;
use crate::decoder::row_decoder::{RowDecoder, pattern_match_variance, record_pattern};
use crate::models::{Barcode, BarcodeFormat, BitArray};

const MAX_AVG_VARIANCE: f32 = 0.38;
const MAX_INDIVIDUAL_VARIANCE: f32 = 0.5;

/// Wide element widths tried, in modules
const W: usize = 3;
const W_ALT: usize = 2;
const N: usize = 1;

const START_PATTERN: [usize; 4] = [N, N, N, N];
const END_PATTERN_REVERSED: [[usize; 3]; 2] = [[N, N, W_ALT], [N, N, W]];

/// Digit patterns with wide = 3, then the same ten with wide = 2
pub(crate) const PATTERNS: [[usize; 5]; 20] = [
    [N, N, W, W, N], // 0
    [W, N, N, N, W], // 1
    [N, W, N, N, W], // 2
    [W, W, N, N, N], // 3
    [N, N, W, N, W], // 4
    [W, N, W, N, N], // 5
    [N, W, W, N, N], // 6
    [N, N, N, W, W], // 7
    [W, N, N, W, N], // 8
    [N, W, N, W, N], // 9
    [N, N, W_ALT, W_ALT, N],
    [W_ALT, N, N, N, W_ALT],
    [N, W_ALT, N, N, W_ALT],
    [W_ALT, W_ALT, N, N, N],
    [N, N, W_ALT, N, W_ALT],
    [W_ALT, N, W_ALT, N, N],
    [N, W_ALT, W_ALT, N, N],
    [N, N, N, W_ALT, W_ALT],
    [W_ALT, N, N, W_ALT, N],
    [N, W_ALT, N, W_ALT, N],
];

/// ITF decoder
///
/// Keeps the narrow bar width measured on the start guard of the current row
/// and a buffer for the reversed row.
pub struct ItfReader {
    narrow_line_width: Option<usize>,
    reversed: BitArray,
    counters: [usize; 10],
}

impl ItfReader {
    /// Create a reader
    pub fn new() -> Self {
        Self {
            narrow_line_width: None,
            reversed: BitArray::default(),
            counters: [0; 10],
        }
    }

    fn decode_start(&mut self, row: &BitArray) -> Result<(usize, usize), DecodeError> {
        let end_start = skip_white_space(row)?;
        let start = find_guard_pattern(row, end_start, &START_PATTERN)?;
        let narrow = (start.1 - start.0) / 4;
        self.narrow_line_width = Some(narrow);
        validate_quiet_zone(row, narrow, start.0)?;
        Ok(start)
    }

    fn decode_end(&mut self, row: &BitArray) -> Result<(usize, usize), DecodeError> {
        row.reverse_into(&mut self.reversed);
        let reversed = &self.reversed;
        let end_start = skip_white_space(reversed)?;
        let end = find_guard_pattern(reversed, end_start, &END_PATTERN_REVERSED[0])
            .or_else(|_| find_guard_pattern(reversed, end_start, &END_PATTERN_REVERSED[1]))?;
        let narrow = self.narrow_line_width.ok_or(DecodeError::NotFound)?;
        validate_quiet_zone(reversed, narrow, end.0)?;
        let size = reversed.len();
        Ok((size - end.1, size - end.0))
    }

    fn decode_middle(
        &mut self,
        row: &BitArray,
        mut payload_start: usize,
        payload_end: usize,
        result: &mut String,
    ) -> Result<(), DecodeError> {
        let mut bars = [0usize; 5];
        let mut spaces = [0usize; 5];
        while payload_start < payload_end {
            record_pattern(row, payload_start, &mut self.counters)?;
            for k in 0..5 {
                bars[k] = self.counters[2 * k];
                spaces[k] = self.counters[2 * k + 1];
            }
            result.push(decode_digit(&bars)?);
            result.push(decode_digit(&spaces)?);
            payload_start += self.counters.iter().sum::<usize>();
        }
        Ok(())
    }
}

impl Default for ItfReader {
    fn default() -> Self {
        Self::new()
    }
}

impl RowDecoder for ItfReader {
    fn decode_row(
        &mut self,
        row_number: usize,
        row: &BitArray,
        config: &DecodeConfig,
    ) -> Result<Barcode, DecodeError> {
        let start = self.decode_start(row)?;
        let end = self.decode_end(row)?;

        let mut result = String::with_capacity(20);
        self.decode_middle(row, start.1, end.0, &mut result)?;

        if !length_allowed(result.len(), config.itf_lengths()) {
            return Err(DecodeError::Format);
        }

        Ok(
            Barcode::new(BarcodeFormat::Itf, result, row_number, start.1 as f32, end.0 as f32)
                .with_symbology_identifier("]I0"),
        )
    }

    fn reset(&mut self) {
        self.narrow_line_width = None;
        self.counters.fill(0);
    }
}

/// Exact match on an allowed length, or longer than every allowed length
fn length_allowed(length: usize, allowed: &[usize]) -> bool {
    allowed.contains(&length) || allowed.iter().all(|&max| length > max)
}

fn skip_white_space(row: &BitArray) -> Result<usize, DecodeError> {
    let end_start = row.next_set(0);
    if end_start == row.len() {
        return Err(DecodeError::NotFound);
    }
    Ok(end_start)
}

/// Ten narrow widths of white (or whatever room the row has) before `start`
fn validate_quiet_zone(row: &BitArray, narrow: usize, start: usize) -> Result<(), DecodeError> {
    let quiet_count = (narrow * 10).min(start);
    if row.is_range(start - quiet_count, start, false) {
        Ok(())
    } else {
        Err(DecodeError::NotFound)
    }
}

fn find_guard_pattern(
    row: &BitArray,
    row_offset: usize,
    pattern: &[usize],
) -> Result<(usize, usize), DecodeError> {
    let pattern_length = pattern.len();
    let mut counters = [0usize; 4];
    let counters = &mut counters[..pattern_length];
    let mut counter_position = 0;
    let mut pattern_start = row_offset;
    let mut is_white = false;

    for x in row_offset..row.len() {
        if row.get(x) != is_white {
            counters[counter_position] += 1;
            continue;
        }
        if counter_position == pattern_length - 1 {
            if pattern_match_variance(counters, pattern, MAX_INDIVIDUAL_VARIANCE) < MAX_AVG_VARIANCE {
                return Ok((pattern_start, x));
            }
            pattern_start += counters[0] + counters[1];
            counters.copy_within(2..pattern_length, 0);
            counters[pattern_length - 2] = 0;
            counters[pattern_length - 1] = 0;
            counter_position -= 1;
        } else {
            counter_position += 1;
        }
        counters[counter_position] = 1;
        is_white = !is_white;
    }
    Err(DecodeError::NotFound)
}

/// Best digit for five element widths; a tie between two patterns is rejected
fn decode_digit(counters: &[usize; 5]) -> Result<char, DecodeError> {
    let mut best_variance = MAX_AVG_VARIANCE;
    let mut best_match = None;
    for (i, pattern) in PATTERNS.iter().enumerate() {
        let variance = pattern_match_variance(counters, pattern, MAX_INDIVIDUAL_VARIANCE);
        if variance < best_variance {
            best_variance = variance;
            best_match = Some(i);
        } else if variance == best_variance {
            best_match = None;
        }
    }
    best_match
        .map(|i| char::from(b'0' + (i % 10) as u8))
        .ok_or(DecodeError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{barcode_row, itf_runs};

    fn decode(reader: &mut ItfReader, row: &BitArray, config: &DecodeConfig) -> Result<Barcode, DecodeError> {
        reader.decode_row(11, row, config)
    }

    #[test]
    fn test_decode_fourteen_digits() {
        let row = barcode_row(&itf_runs("00012345678905"), 2, 40);
        let barcode = decode(&mut ItfReader::new(), &row, &DecodeConfig::default()).unwrap();
        assert_eq!(barcode.format, BarcodeFormat::Itf);
        assert_eq!(barcode.text, "00012345678905");
        assert_eq!(barcode.metadata.symbology_identifier.as_deref(), Some("]I0"));
        assert!(barcode.points[0].x < barcode.points[1].x);
    }

    #[test]
    fn test_length_not_allowed() {
        let row = barcode_row(&itf_runs("1234"), 2, 40);
        let mut reader = ItfReader::new();
        assert_eq!(
            decode(&mut reader, &row, &DecodeConfig::default()),
            Err(DecodeError::Format)
        );

        let config = DecodeConfig::new().with_itf_lengths([4]);
        assert_eq!(decode(&mut reader, &row, &config).unwrap().text, "1234");
    }

    #[test]
    fn test_longer_than_every_allowed_length() {
        let row = barcode_row(&itf_runs("1234567890123456"), 2, 40);
        let barcode = decode(&mut ItfReader::new(), &row, &DecodeConfig::default()).unwrap();
        assert_eq!(barcode.text, "1234567890123456");
    }

    #[test]
    fn test_quiet_zone_required() {
        // Ten narrow widths are needed before the start guard
        let mut row = barcode_row(&itf_runs("123456"), 2, 40);
        row.set(30, true);
        assert_eq!(
            decode(&mut ItfReader::new(), &row, &DecodeConfig::default()),
            Err(DecodeError::NotFound)
        );
    }

    #[test]
    fn test_blank_row() {
        assert_eq!(
            decode(&mut ItfReader::new(), &BitArray::new(120), &DecodeConfig::default()),
            Err(DecodeError::NotFound)
        );
    }

    #[test]
    fn test_length_allowed() {
        assert!(length_allowed(6, &[6, 8]));
        assert!(!length_allowed(7, &[6, 8]));
        assert!(length_allowed(10, &[6, 8]));
    }

    #[test]
    fn test_decode_digit_wide_two() {
        assert_eq!(decode_digit(&[1, 1, 2, 2, 1]), Ok('0'));
        assert_eq!(decode_digit(&[3, 1, 1, 1, 3]), Ok('1'));
    }
}
