//! Code 39 row decoder
//!
//! Each character is nine elements (five bars, four spaces), exactly three of
//! them wide, separated by a narrow inter-character gap. Symbols are framed by
//! `*`.

use crate::decoder::config::DecodeConfig;
use crate::decoder::error::DecodeError;
use crate::decoder::row_decoder::{RowDecoder, record_pattern};
use crate::models::{Barcode, BarcodeFormat, BitArray};

/// Characters in check-digit order
pub(crate) const ALPHABET: &[u8; 43] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

/// Narrow/wide layout of each character in [`ALPHABET`]; bit 8 is the first
/// bar, a set bit marks a wide element.
pub(crate) const CHARACTER_ENCODINGS: [u16; 43] = [
    0x034, 0x121, 0x061, 0x160, 0x031, 0x130, 0x070, 0x025, 0x124, 0x064, // 0-9
    0x109, 0x049, 0x148, 0x019, 0x118, 0x058, 0x00D, 0x10C, 0x04C, 0x01C, // A-J
    0x103, 0x043, 0x142, 0x013, 0x112, 0x052, 0x007, 0x106, 0x046, 0x016, // K-T
    0x181, 0x0C1, 0x1C0, 0x091, 0x190, 0x0D0, 0x085, 0x184, 0x0C4, 0x0A8, // U-$
    0x0A2, 0x08A, 0x02A, // /-%
];

/// Start/stop character `*`
pub(crate) const ASTERISK_ENCODING: u16 = 0x094;

/// Code 39 decoder
pub struct Code39Reader {
    using_check_digit: bool,
    counters: [usize; 9],
    decoded: String,
}

impl Code39Reader {
    /// Create a reader that treats the last character as data
    pub fn new() -> Self {
        Self::with_check_digit(false)
    }

    /// Create a reader; when `using_check_digit` is set the final character
    /// must be the mod-43 check digit and is removed from the result
    pub fn with_check_digit(using_check_digit: bool) -> Self {
        Self {
            using_check_digit,
            counters: [0; 9],
            decoded: String::with_capacity(20),
        }
    }

    fn find_asterisk_pattern(&mut self, row: &BitArray) -> Result<(usize, usize), DecodeError> {
        let width = row.len();
        let row_offset = row.next_set(0);
        let counters = &mut self.counters;
        counters.fill(0);

        let mut counter_position = 0;
        let mut pattern_start = row_offset;
        let mut is_white = false;
        let pattern_length = counters.len();

        for i in row_offset..width {
            if row.get(i) != is_white {
                counters[counter_position] += 1;
                continue;
            }
            if counter_position == pattern_length - 1 {
                // Half the pattern width of white before the start character
                let quiet_start = pattern_start.saturating_sub((i - pattern_start) / 2);
                if to_narrow_wide_pattern(&counters[..]) == Some(ASTERISK_ENCODING)
                    && row.is_range(quiet_start, pattern_start, false)
                {
                    return Ok((pattern_start, i));
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
}

impl Default for Code39Reader {
    fn default() -> Self {
        Self::new()
    }
}

impl RowDecoder for Code39Reader {
    fn decode_row(
        &mut self,
        row_number: usize,
        row: &BitArray,
        _config: &DecodeConfig,
    ) -> Result<Barcode, DecodeError> {
        let start = self.find_asterisk_pattern(row)?;
        let mut next_start = row.next_set(start.1);
        let end = row.len();

        self.decoded.clear();
        let mut last_start;
        loop {
            record_pattern(row, next_start, &mut self.counters)?;
            let pattern = to_narrow_wide_pattern(&self.counters).ok_or(DecodeError::NotFound)?;
            let decoded_char = pattern_to_char(pattern).ok_or(DecodeError::NotFound)?;
            self.decoded.push(decoded_char);
            last_start = next_start;
            next_start += self.counters.iter().sum::<usize>();
            next_start = row.next_set(next_start);
            if decoded_char == '*' {
                break;
            }
        }
        // Drop the stop character
        self.decoded.pop();

        // Trailing quiet zone must be at least half the last character wide
        let last_pattern_size: usize = self.counters.iter().sum();
        let white_space_after_end = next_start - last_start - last_pattern_size;
        if next_start != end && white_space_after_end * 2 < last_pattern_size {
            return Err(DecodeError::NotFound);
        }

        if self.using_check_digit {
            let check = self.decoded.pop().ok_or(DecodeError::NotFound)?;
            if Some(check) != check_character(&self.decoded) {
                return Err(DecodeError::Checksum);
            }
        }

        if self.decoded.is_empty() {
            // Framing characters with nothing between them
            return Err(DecodeError::NotFound);
        }

        let left = (start.0 + start.1) as f32 / 2.0;
        let right = last_start as f32 + last_pattern_size as f32 / 2.0;
        Ok(
            Barcode::new(BarcodeFormat::Code39, self.decoded.clone(), row_number, left, right)
                .with_symbology_identifier(if self.using_check_digit { "]A3" } else { "]A0" }),
        )
    }

    fn reset(&mut self) {
        self.counters.fill(0);
        self.decoded.clear();
    }
}

/// Classify the nine counters as narrow/wide; exactly three must be wide and
/// no wide element may be as wide as the other two together.
pub(crate) fn to_narrow_wide_pattern(counters: &[usize]) -> Option<u16> {
    let num_counters = counters.len();
    let mut max_narrow_counter = 0;
    loop {
        let min_counter = counters
            .iter()
            .copied()
            .filter(|&c| c > max_narrow_counter)
            .min()?;
        max_narrow_counter = min_counter;

        let mut wide_counters = 0;
        let mut total_wide_counters_width = 0;
        let mut pattern = 0u16;
        for (i, &counter) in counters.iter().enumerate() {
            if counter > max_narrow_counter {
                pattern |= 1 << (num_counters - 1 - i);
                wide_counters += 1;
                total_wide_counters_width += counter;
            }
        }

        if wide_counters == 3 {
            let too_wide = counters
                .iter()
                .filter(|&&c| c > max_narrow_counter)
                .any(|&c| c * 2 >= total_wide_counters_width);
            return if too_wide { None } else { Some(pattern) };
        }
        if wide_counters <= 3 {
            return None;
        }
    }
}

fn pattern_to_char(pattern: u16) -> Option<char> {
    if pattern == ASTERISK_ENCODING {
        return Some('*');
    }
    CHARACTER_ENCODINGS
        .iter()
        .position(|&encoding| encoding == pattern)
        .map(|i| ALPHABET[i] as char)
}

/// Mod-43 check character for `content`
pub(crate) fn check_character(content: &str) -> Option<char> {
    let mut total = 0usize;
    for c in content.bytes() {
        total += ALPHABET.iter().position(|&a| a == c)?;
    }
    Some(ALPHABET[total % ALPHABET.len()] as char)
}
