//! UPC/EAN family decoders
//!
//! All four symbologies share the same digit alphabet, guard patterns and
//! check digit. Each reader only knows how to decode the digits between the
//! guards; locating the start guard happens once per row so the
//! [`MultiFormatUpcEanReader`] can hand the same location to every member.

/// EAN-13 reader
pub mod ean13;
/// EAN-8 reader
pub mod ean8;
/// Family composite
pub mod multi;
/// UPC-A reader (EAN-13 with a leading zero)
pub mod upca;
/// UPC-E reader (zero-suppressed UPC-A)
pub mod upce;

pub use ean13::Ean13Reader;
pub use ean8::Ean8Reader;
pub use multi::MultiFormatUpcEanReader;
pub use upca::UpcAReader;
pub use upce::UpcEReader;

use crate::decoder::error::DecodeError;
use crate::decoder::row_decoder::{pattern_match_variance, record_pattern};
use crate::models::{Barcode, BarcodeFormat, BitArray};

const MAX_AVG_VARIANCE: f32 = 0.48;
const MAX_INDIVIDUAL_VARIANCE: f32 = 0.7;

/// Start and end guard
pub(crate) const START_END_PATTERN: [usize; 3] = [1, 1, 1];
/// Guard between the left and right halves
pub(crate) const MIDDLE_PATTERN: [usize; 5] = [1, 1, 1, 1, 1];
/// UPC-E end guard
pub(crate) const END_PATTERN_UPCE: [usize; 6] = [1, 1, 1, 1, 1, 1];

/// Odd-parity ("L") digit widths
pub(crate) const L_PATTERNS: [[usize; 4]; 10] = [
    [3, 2, 1, 1], // 0
    [2, 2, 2, 1], // 1
    [2, 1, 2, 2], // 2
    [1, 4, 1, 1], // 3
    [1, 1, 3, 2], // 4
    [1, 2, 3, 1], // 5
    [1, 1, 1, 4], // 6
    [1, 3, 1, 2], // 7
    [1, 2, 1, 3], // 8
    [3, 1, 1, 2], // 9
];

/// L patterns followed by the even-parity ("G") patterns, which are the L
/// patterns reversed
pub(crate) const L_AND_G_PATTERNS: [[usize; 4]; 20] = {
    let mut patterns = [[0usize; 4]; 20];
    let mut i = 0;
    while i < 10 {
        patterns[i] = L_PATTERNS[i];
        let l = L_PATTERNS[i];
        patterns[i + 10] = [l[3], l[2], l[1], l[0]];
        i += 1;
    }
    patterns
};

/// EAN-13 first digit, encoded as the L/G parity of the next six digits
/// (bit 5 is the first of them, set means G)
pub(crate) const FIRST_DIGIT_ENCODINGS: [u8; 10] =
    [0x00, 0x0B, 0x0D, 0x0E, 0x13, 0x19, 0x1C, 0x15, 0x16, 0x1A];

/// UPC-E number system (0 or 1) and check digit, encoded as digit parity
pub(crate) const NUMSYS_AND_CHECK_DIGIT_PATTERNS: [[u8; 10]; 2] = [
    [0x38, 0x34, 0x32, 0x31, 0x2C, 0x26, 0x23, 0x2A, 0x29, 0x25],
    [0x07, 0x0B, 0x0D, 0x0E, 0x13, 0x19, 0x1C, 0x15, 0x16, 0x1A],
];

/// Digit decoding for one member of the UPC/EAN family
pub trait UpcEanReader: Send {
    /// Format reported on success
    fn format(&self) -> BarcodeFormat;

    /// Decode the digits after the start guard into `result`, returning the
    /// offset where the end guard begins
    fn decode_middle(
        &mut self,
        row: &BitArray,
        start_range: (usize, usize),
        result: &mut String,
    ) -> Result<usize, DecodeError>;

    /// Locate the end guard
    fn decode_end(&mut self, row: &BitArray, end_start: usize) -> Result<(usize, usize), DecodeError> {
        find_guard_pattern(row, end_start, false, &START_END_PATTERN)
    }

    /// Validate the check digit of the decoded text
    fn check_checksum(&self, text: &str) -> Result<bool, DecodeError> {
        check_standard_checksum(text)
    }

    /// Decode a row whose start guard has already been found
    fn decode_row_with_start(
        &mut self,
        row_number: usize,
        row: &BitArray,
        start_range: (usize, usize),
    ) -> Result<Barcode, DecodeError> {
        let mut result = String::with_capacity(20);
        let end_start = self.decode_middle(row, start_range, &mut result)?;
        let end_range = self.decode_end(row, end_start)?;

        // Quiet zone after the symbol at least as wide as the end guard
        let end = end_range.1;
        let quiet_end = end + (end - end_range.0);
        if quiet_end >= row.len() || !row.is_range(end, quiet_end, false) {
            return Err(DecodeError::NotFound);
        }

        if result.len() < 8 {
            return Err(DecodeError::Format);
        }
        if !self.check_checksum(&result)? {
            return Err(DecodeError::Checksum);
        }

        let format = self.format();
        let left = (start_range.0 + start_range.1) as f32 / 2.0;
        let right = (end_range.0 + end_range.1) as f32 / 2.0;
        let identifier = if format == BarcodeFormat::Ean8 { "]E4" } else { "]E0" };
        Ok(Barcode::new(format, result, row_number, left, right).with_symbology_identifier(identifier))
    }

    /// Discard scratch state
    fn reset(&mut self) {}
}

/// Decode a row with a single family member, finding the start guard first
pub(crate) fn decode_standalone<R: UpcEanReader + ?Sized>(
    reader: &mut R,
    row_number: usize,
    row: &BitArray,
) -> Result<Barcode, DecodeError> {
    let start_range = find_start_guard_pattern(row)?;
    reader.decode_row_with_start(row_number, row, start_range)
}

/// First start guard preceded by white at least as wide as the guard itself
pub fn find_start_guard_pattern(row: &BitArray) -> Result<(usize, usize), DecodeError> {
    let mut next_start = 0;
    loop {
        let (start, end) = find_guard_pattern(row, next_start, false, &START_END_PATTERN)?;
        next_start = end;
        let width = end - start;
        if start >= width && row.is_range(start - width, start, false) {
            return Ok((start, end));
        }
    }
}

/// Find `pattern` at or after `row_offset`, starting on a space when
/// `white_first` is set
pub(crate) fn find_guard_pattern(
    row: &BitArray,
    row_offset: usize,
    white_first: bool,
    pattern: &[usize],
) -> Result<(usize, usize), DecodeError> {
    let width = row.len();
    let row_offset = if white_first {
        row.next_unset(row_offset)
    } else {
        row.next_set(row_offset)
    };
    let pattern_length = pattern.len();
    let mut counters = [0usize; 6];
    let counters = &mut counters[..pattern_length];
    let mut counter_position = 0;
    let mut pattern_start = row_offset;
    let mut is_white = white_first;

    for x in row_offset..width {
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

/// Index of the best matching digit pattern for the four runs at `row_offset`
pub(crate) fn decode_digit(
    row: &BitArray,
    counters: &mut [usize; 4],
    row_offset: usize,
    patterns: &[[usize; 4]],
) -> Result<usize, DecodeError> {
    record_pattern(row, row_offset, counters)?;
    let mut best_variance = MAX_AVG_VARIANCE;
    let mut best_match = None;
    for (i, pattern) in patterns.iter().enumerate() {
        let variance = pattern_match_variance(&counters[..], pattern, MAX_INDIVIDUAL_VARIANCE);
        if variance < best_variance {
            best_variance = variance;
            best_match = Some(i);
        }
    }
    best_match.ok_or(DecodeError::NotFound)
}

/// Whether the last digit of `text` is the standard UPC/EAN check digit
pub fn check_standard_checksum(text: &str) -> Result<bool, DecodeError> {
    let Some((&last, body)) = text.as_bytes().split_last() else {
        return Ok(false);
    };
    let check = digit_value(last)?;
    Ok(standard_checksum(body)? == check)
}

/// Check digit for `digits`: weight 3 on every other digit from the right
pub(crate) fn standard_checksum(digits: &[u8]) -> Result<u32, DecodeError> {
    let mut sum = 0u32;
    for (i, &b) in digits.iter().rev().enumerate() {
        let weight = if i % 2 == 0 { 3 } else { 1 };
        sum += weight * digit_value(b)?;
    }
    Ok((1000 - sum % 1000) % 10)
}

fn digit_value(b: u8) -> Result<u32, DecodeError> {
    if b.is_ascii_digit() {
        Ok(u32::from(b - b'0'))
    } else {
        Err(DecodeError::Format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{barcode_row, ean13_runs, row_from_runs};

    #[test]
    fn test_g_patterns_are_reversed() {
        assert_eq!(L_AND_G_PATTERNS[3], [1, 4, 1, 1]);
        assert_eq!(L_AND_G_PATTERNS[13], [1, 1, 4, 1]);
    }

    #[test]
    fn test_standard_checksum() {
        assert_eq!(check_standard_checksum("5901234123457"), Ok(true));
        assert_eq!(check_standard_checksum("5901234123458"), Ok(false));
        assert_eq!(check_standard_checksum("96385074"), Ok(true));
        assert_eq!(check_standard_checksum(""), Ok(false));
        assert_eq!(check_standard_checksum("12a4"), Err(DecodeError::Format));
    }

    #[test]
    fn test_start_guard_needs_quiet_zone() {
        // A guard-like triple glued to the left edge is skipped
        let mut runs = vec![1, 1, 1, 8];
        runs.extend(ean13_runs("5901234123457"));
        let row = row_from_runs(0, &runs, 10);
        let start = find_start_guard_pattern(&row).unwrap();
        assert_eq!(start, (11, 14));
    }

    #[test]
    fn test_start_guard_on_clean_row() {
        let row = barcode_row(&ean13_runs("5901234123457"), 2, 20);
        assert_eq!(find_start_guard_pattern(&row), Ok((20, 26)));
    }
}
