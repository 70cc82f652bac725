//! Code 128 row decoder
//!
//! Every code value is six elements spanning eleven modules; the stop code
//! adds a seventh, two-module bar. Three code sets (A, B, C) map values to
//! characters and are switched by in-band control codes.

use crate::decoder::config::DecodeConfig;
use crate::decoder::error::DecodeError;
use crate::decoder::row_decoder::{RowDecoder, pattern_match_variance, record_pattern};
use crate::models::{Barcode, BarcodeFormat, BitArray};

/// Element widths of every code value, in modules
pub(crate) const CODE_PATTERNS: [&[usize]; 107] = [
    &[2, 1, 2, 2, 2, 2], // 0
    &[2, 2, 2, 1, 2, 2],
    &[2, 2, 2, 2, 2, 1],
    &[1, 2, 1, 2, 2, 3],
    &[1, 2, 1, 3, 2, 2],
    &[1, 3, 1, 2, 2, 2], // 5
    &[1, 2, 2, 2, 1, 3],
    &[1, 2, 2, 3, 1, 2],
    &[1, 3, 2, 2, 1, 2],
    &[2, 2, 1, 2, 1, 3],
    &[2, 2, 1, 3, 1, 2], // 10
    &[2, 3, 1, 2, 1, 2],
    &[1, 1, 2, 2, 3, 2],
    &[1, 2, 2, 1, 3, 2],
    &[1, 2, 2, 2, 3, 1],
    &[1, 1, 3, 2, 2, 2], // 15
    &[1, 2, 3, 1, 2, 2],
    &[1, 2, 3, 2, 2, 1],
    &[2, 2, 3, 2, 1, 1],
    &[2, 2, 1, 1, 3, 2],
    &[2, 2, 1, 2, 3, 1], // 20
    &[2, 1, 3, 2, 1, 2],
    &[2, 2, 3, 1, 1, 2],
    &[3, 1, 2, 1, 3, 1],
    &[3, 1, 1, 2, 2, 2],
    &[3, 2, 1, 1, 2, 2], // 25
    &[3, 2, 1, 2, 2, 1],
    &[3, 1, 2, 2, 1, 2],
    &[3, 2, 2, 1, 1, 2],
    &[3, 2, 2, 2, 1, 1],
    &[2, 1, 2, 1, 2, 3], // 30
    &[2, 1, 2, 3, 2, 1],
    &[2, 3, 2, 1, 2, 1],
    &[1, 1, 1, 3, 2, 3],
    &[1, 3, 1, 1, 2, 3],
    &[1, 3, 1, 3, 2, 1], // 35
    &[1, 1, 2, 3, 1, 3],
    &[1, 3, 2, 1, 1, 3],
    &[1, 3, 2, 3, 1, 1],
    &[2, 1, 1, 3, 1, 3],
    &[2, 3, 1, 1, 1, 3], // 40
    &[2, 3, 1, 3, 1, 1],
    &[1, 1, 2, 1, 3, 3],
    &[1, 1, 2, 3, 3, 1],
    &[1, 3, 2, 1, 3, 1],
    &[1, 1, 3, 1, 2, 3], // 45
    &[1, 1, 3, 3, 2, 1],
    &[1, 3, 3, 1, 2, 1],
    &[3, 1, 3, 1, 2, 1],
    &[2, 1, 1, 3, 3, 1],
    &[2, 3, 1, 1, 3, 1], // 50
    &[2, 1, 3, 1, 1, 3],
    &[2, 1, 3, 3, 1, 1],
    &[2, 1, 3, 1, 3, 1],
    &[3, 1, 1, 1, 2, 3],
    &[3, 1, 1, 3, 2, 1], // 55
    &[3, 3, 1, 1, 2, 1],
    &[3, 1, 2, 1, 1, 3],
    &[3, 1, 2, 3, 1, 1],
    &[3, 3, 2, 1, 1, 1],
    &[3, 1, 4, 1, 1, 1], // 60
    &[2, 2, 1, 4, 1, 1],
    &[4, 3, 1, 1, 1, 1],
    &[1, 1, 1, 2, 2, 4],
    &[1, 1, 1, 4, 2, 2],
    &[1, 2, 1, 1, 2, 4], // 65
    &[1, 2, 1, 4, 2, 1],
    &[1, 4, 1, 1, 2, 2],
    &[1, 4, 1, 2, 2, 1],
    &[1, 1, 2, 2, 1, 4],
    &[1, 1, 2, 4, 1, 2], // 70
    &[1, 2, 2, 1, 1, 4],
    &[1, 2, 2, 4, 1, 1],
    &[1, 4, 2, 1, 1, 2],
    &[1, 4, 2, 2, 1, 1],
    &[2, 4, 1, 2, 1, 1], // 75
    &[2, 2, 1, 1, 1, 4],
    &[4, 1, 3, 1, 1, 1],
    &[2, 4, 1, 1, 1, 2],
    &[1, 3, 4, 1, 1, 1],
    &[1, 1, 1, 2, 4, 2], // 80
    &[1, 2, 1, 1, 4, 2],
    &[1, 2, 1, 2, 4, 1],
    &[1, 1, 4, 2, 1, 2],
    &[1, 2, 4, 1, 1, 2],
    &[1, 2, 4, 2, 1, 1], // 85
    &[4, 1, 1, 2, 1, 2],
    &[4, 2, 1, 1, 1, 2],
    &[4, 2, 1, 2, 1, 1],
    &[2, 1, 2, 1, 4, 1],
    &[2, 1, 4, 1, 2, 1], // 90
    &[4, 1, 2, 1, 2, 1],
    &[1, 1, 1, 1, 4, 3],
    &[1, 1, 1, 3, 4, 1],
    &[1, 3, 1, 1, 4, 1],
    &[1, 1, 4, 1, 1, 3], // 95
    &[1, 1, 4, 3, 1, 1],
    &[4, 1, 1, 1, 1, 3],
    &[4, 1, 1, 3, 1, 1],
    &[1, 1, 3, 1, 4, 1],
    &[1, 1, 4, 1, 3, 1], // 100
    &[3, 1, 1, 1, 4, 1],
    &[4, 1, 1, 1, 3, 1],
    &[2, 1, 1, 4, 1, 2],
    &[2, 1, 1, 2, 1, 4],
    &[2, 1, 1, 2, 3, 2], // 105
    &[2, 3, 3, 1, 1, 1, 2],
];

const MAX_AVG_VARIANCE: f32 = 0.25;
const MAX_INDIVIDUAL_VARIANCE: f32 = 0.7;

pub(crate) const CODE_SHIFT: usize = 98;
pub(crate) const CODE_CODE_C: usize = 99;
pub(crate) const CODE_CODE_B: usize = 100;
pub(crate) const CODE_CODE_A: usize = 101;
pub(crate) const CODE_FNC_1: usize = 102;
pub(crate) const CODE_FNC_2: usize = 97;
pub(crate) const CODE_FNC_3: usize = 96;
pub(crate) const CODE_FNC_4_A: usize = 101;
pub(crate) const CODE_FNC_4_B: usize = 100;
pub(crate) const CODE_START_A: usize = 103;
pub(crate) const CODE_START_B: usize = 104;
pub(crate) const CODE_START_C: usize = 105;
pub(crate) const CODE_STOP: usize = 106;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeSet {
    A,
    B,
    C,
}

/// Start pattern location plus the start code it matched
struct StartPattern {
    start: usize,
    end: usize,
    code: usize,
}

/// Code 128 decoder
pub struct Code128Reader {
    counters: [usize; 6],
    raw_codes: Vec<u8>,
}

impl Code128Reader {
    /// Create a reader
    pub fn new() -> Self {
        Self {
            counters: [0; 6],
            raw_codes: Vec::with_capacity(20),
        }
    }

    fn find_start_pattern(&mut self, row: &BitArray) -> Result<StartPattern, DecodeError> {
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
                let mut best_variance = MAX_AVG_VARIANCE;
                let mut best_match = None;
                for start_code in CODE_START_A..=CODE_START_C {
                    let variance = pattern_match_variance(
                        &counters[..],
                        CODE_PATTERNS[start_code],
                        MAX_INDIVIDUAL_VARIANCE,
                    );
                    if variance < best_variance {
                        best_variance = variance;
                        best_match = Some(start_code);
                    }
                }
                // Half the pattern width of white before the start code
                let quiet_start = pattern_start.saturating_sub((i - pattern_start) / 2);
                if let Some(code) = best_match {
                    if row.is_range(quiet_start, pattern_start, false) {
                        return Ok(StartPattern {
                            start: pattern_start,
                            end: i,
                            code,
                        });
                    }
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

    fn decode_code(&mut self, row: &BitArray, row_offset: usize) -> Result<usize, DecodeError> {
        record_pattern(row, row_offset, &mut self.counters)?;
        let mut best_variance = MAX_AVG_VARIANCE;
        let mut best_match = None;
        for (code, pattern) in CODE_PATTERNS.iter().enumerate() {
            let variance =
                pattern_match_variance(&self.counters, pattern, MAX_INDIVIDUAL_VARIANCE);
            if variance < best_variance {
                best_variance = variance;
                best_match = Some(code);
            }
        }
        best_match.ok_or(DecodeError::NotFound)
    }
}

impl Default for Code128Reader {
    fn default() -> Self {
        Self::new()
    }
}

/// FNC1 position decides the AIM modifier (GS1 or AIM application identifiers)
fn fnc1_modifier(result: &str, current: u8) -> u8 {
    match result.len() {
        0 => 1,
        1 => 2,
        _ => current,
    }
}

/// Apply FNC4 to the upper/shift-upper latch pair
fn apply_fnc4(upper_mode: &mut bool, shift_upper_mode: &mut bool) {
    if !*upper_mode && *shift_upper_mode {
        *upper_mode = true;
        *shift_upper_mode = false;
    } else if *upper_mode && *shift_upper_mode {
        *upper_mode = false;
        *shift_upper_mode = false;
    } else {
        *shift_upper_mode = true;
    }
}

fn push_latin1(result: &mut String, value: usize, extended: bool) {
    let value = if extended { value + 128 } else { value };
    if let Some(c) = char::from_u32(value as u32) {
        result.push(c);
    }
}

impl RowDecoder for Code128Reader {
    fn decode_row(
        &mut self,
        row_number: usize,
        row: &BitArray,
        _config: &DecodeConfig,
    ) -> Result<Barcode, DecodeError> {
        let start = self.find_start_pattern(row)?;
        let start_code = start.code;

        self.raw_codes.clear();
        self.raw_codes.push(start_code as u8);

        let mut code_set = match start_code {
            CODE_START_A => CodeSet::A,
            CODE_START_B => CodeSet::B,
            CODE_START_C => CodeSet::C,
            _ => return Err(DecodeError::Format),
        };

        let mut result = String::with_capacity(20);
        let mut symbology_modifier = 0u8;
        let mut done = false;
        let mut is_next_shifted = false;

        let mut last_start;
        let mut next_start = start.end;

        let mut last_code;
        let mut code = 0usize;
        let mut checksum_total = start_code;
        let mut multiplier = 0usize;
        let mut last_character_was_printable = true;
        let mut upper_mode = false;
        let mut shift_upper_mode = false;

        loop {
            let unshift = is_next_shifted;
            is_next_shifted = false;

            last_code = code;
            code = self.decode_code(row, next_start)?;
            self.raw_codes.push(code as u8);

            if code != CODE_STOP {
                last_character_was_printable = true;
                multiplier += 1;
                checksum_total += multiplier * code;
            }

            last_start = next_start;
            next_start += self.counters.iter().sum::<usize>();

            if matches!(code, CODE_START_A | CODE_START_B | CODE_START_C) {
                return Err(DecodeError::Format);
            }

            match code_set {
                CodeSet::A | CodeSet::B if code < 64 || (code_set == CodeSet::B && code < 96) => {
                    push_latin1(&mut result, b' ' as usize + code, shift_upper_mode != upper_mode);
                    shift_upper_mode = false;
                }
                CodeSet::A if code < 96 => {
                    push_latin1(&mut result, code - 64, shift_upper_mode != upper_mode);
                    shift_upper_mode = false;
                }
                CodeSet::A | CodeSet::B => {
                    if code != CODE_STOP {
                        last_character_was_printable = false;
                    }
                    match code {
                        CODE_FNC_1 => {
                            symbology_modifier = fnc1_modifier(&result, symbology_modifier);
                        }
                        CODE_FNC_2 => symbology_modifier = 4,
                        CODE_FNC_3 => {}
                        CODE_FNC_4_A if code_set == CodeSet::A => {
                            apply_fnc4(&mut upper_mode, &mut shift_upper_mode);
                        }
                        CODE_FNC_4_B if code_set == CodeSet::B => {
                            apply_fnc4(&mut upper_mode, &mut shift_upper_mode);
                        }
                        CODE_SHIFT => {
                            is_next_shifted = true;
                            code_set = if code_set == CodeSet::A {
                                CodeSet::B
                            } else {
                                CodeSet::A
                            };
                        }
                        CODE_CODE_A => code_set = CodeSet::A,
                        CODE_CODE_B => code_set = CodeSet::B,
                        CODE_CODE_C => code_set = CodeSet::C,
                        CODE_STOP => done = true,
                        _ => {}
                    }
                }
                CodeSet::C if code < 100 => {
                    if code < 10 {
                        result.push('0');
                    }
                    result.push_str(&code.to_string());
                }
                CodeSet::C => {
                    if code != CODE_STOP {
                        last_character_was_printable = false;
                    }
                    match code {
                        CODE_FNC_1 => {
                            symbology_modifier = fnc1_modifier(&result, symbology_modifier);
                        }
                        CODE_CODE_A => code_set = CodeSet::A,
                        CODE_CODE_B => code_set = CodeSet::B,
                        CODE_STOP => done = true,
                        _ => {}
                    }
                }
            }

            // A shift applies to exactly one code value
            if unshift {
                code_set = if code_set == CodeSet::A {
                    CodeSet::B
                } else {
                    CodeSet::A
                };
            }
            if done {
                break;
            }
        }

        let last_pattern_size = next_start - last_start;

        // Final bar of the stop pattern, then a quiet zone half the stop width
        let next_start = row.next_unset(next_start);
        let quiet_end = row
            .len()
            .min(next_start + (next_start - last_start) / 2);
        if !row.is_range(next_start, quiet_end, false) {
            return Err(DecodeError::NotFound);
        }

        // The check character is the code read just before the stop code
        checksum_total -= multiplier * last_code;
        if checksum_total % 103 != last_code {
            return Err(DecodeError::Checksum);
        }

        if result.is_empty() {
            return Err(DecodeError::NotFound);
        }

        // Drop the check character if it was rendered as text
        if last_character_was_printable {
            let drop = if code_set == CodeSet::C { 2 } else { 1 };
            for _ in 0..drop {
                result.pop();
            }
        }

        let left = (start.start + start.end) as f32 / 2.0;
        let right = last_start as f32 + last_pattern_size as f32 / 2.0;
        Ok(Barcode::new(BarcodeFormat::Code128, result, row_number, left, right)
            .with_raw_bytes(self.raw_codes.clone())
            .with_symbology_identifier(format!("]C{symbology_modifier}")))
    }

    fn reset(&mut self) {
        self.counters.fill(0);
        self.raw_codes.clear();
    }
}
