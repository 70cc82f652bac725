//! Synthetic rows for unit tests. Runs always start with a bar.

use crate::decoder::code39::{ALPHABET, ASTERISK_ENCODING, CHARACTER_ENCODINGS};
use crate::decoder::code128::{CODE_PATTERNS, CODE_START_B, CODE_START_C, CODE_STOP};
use crate::decoder::itf::PATTERNS as ITF_PATTERNS;
use crate::decoder::upc_ean::{
    FIRST_DIGIT_ENCODINGS, L_PATTERNS, NUMSYS_AND_CHECK_DIGIT_PATTERNS,
};
use crate::models::BitArray;

/// White `quiet_before` pixels, alternating bar/space runs, white `quiet_after`
pub(crate) fn row_from_runs(quiet_before: usize, runs: &[usize], quiet_after: usize) -> BitArray {
    let total = quiet_before + runs.iter().sum::<usize>() + quiet_after;
    let mut row = BitArray::new(total);
    let mut pos = quiet_before;
    for (i, &run) in runs.iter().enumerate() {
        if i % 2 == 0 {
            row.set_range(pos, pos + run, true);
        }
        pos += run;
    }
    row
}

/// Module runs scaled to `unit` pixels with `quiet` pixels of white each side
pub(crate) fn barcode_row(runs: &[usize], unit: usize, quiet: usize) -> BitArray {
    let scaled: Vec<usize> = runs.iter().map(|r| r * unit).collect();
    row_from_runs(quiet, &scaled, quiet)
}

fn code39_char_runs(encoding: u16, out: &mut Vec<usize>) {
    for i in 0..9 {
        let wide = (encoding >> (8 - i)) & 1 == 1;
        out.push(if wide { 3 } else { 1 });
    }
}

/// Code 39 symbol for `content`, including the `*` framing
pub(crate) fn code39_runs(content: &str) -> Vec<usize> {
    let mut runs = Vec::new();
    code39_char_runs(ASTERISK_ENCODING, &mut runs);
    for c in content.bytes() {
        let index = ALPHABET
            .iter()
            .position(|&a| a == c)
            .expect("character not in Code 39 alphabet");
        runs.push(1);
        code39_char_runs(CHARACTER_ENCODINGS[index], &mut runs);
    }
    runs.push(1);
    code39_char_runs(ASTERISK_ENCODING, &mut runs);
    runs
}

/// Start code, data values, mod-103 check value and stop code
pub(crate) fn code128_values(start: usize, data: &[usize]) -> Vec<usize> {
    let mut checksum = start;
    for (i, &value) in data.iter().enumerate() {
        checksum += (i + 1) * value;
    }
    let mut values = vec![start];
    values.extend_from_slice(data);
    values.push(checksum % 103);
    values.push(CODE_STOP);
    values
}

/// Code set B values for printable ASCII `text`
pub(crate) fn code128_b_values(text: &str) -> Vec<usize> {
    let data: Vec<usize> = text.bytes().map(|b| (b - b' ') as usize).collect();
    code128_values(CODE_START_B, &data)
}

/// Code set C values for an even-length digit string
pub(crate) fn code128_c_values(digits: &str) -> Vec<usize> {
    let data: Vec<usize> = digits
        .as_bytes()
        .chunks(2)
        .map(|pair| ((pair[0] - b'0') * 10 + (pair[1] - b'0')) as usize)
        .collect();
    code128_values(CODE_START_C, &data)
}

pub(crate) fn code128_runs(values: &[usize]) -> Vec<usize> {
    values
        .iter()
        .flat_map(|&v| CODE_PATTERNS[v].iter().copied())
        .collect()
}

/// Interleaved 2 of 5 symbol with wide elements three modules wide
pub(crate) fn itf_runs(digits: &str) -> Vec<usize> {
    let digits: Vec<usize> = digits.bytes().map(|b| (b - b'0') as usize).collect();
    let mut runs = vec![1, 1, 1, 1];
    for pair in digits.chunks(2) {
        for k in 0..5 {
            runs.push(ITF_PATTERNS[pair[0]][k]);
            runs.push(ITF_PATTERNS[pair[1]][k]);
        }
    }
    runs.extend_from_slice(&[3, 1, 1]);
    runs
}

fn digit_runs(digit: u8, use_g: bool, out: &mut Vec<usize>) {
    let pattern = L_PATTERNS[(digit - b'0') as usize];
    if use_g {
        out.extend(pattern.iter().rev());
    } else {
        out.extend_from_slice(&pattern);
    }
}

/// EAN-13 symbol for a 13-digit string with a valid check digit
pub(crate) fn ean13_runs(digits: &str) -> Vec<usize> {
    let d = digits.as_bytes();
    let parity = FIRST_DIGIT_ENCODINGS[(d[0] - b'0') as usize];
    let mut runs = vec![1, 1, 1];
    for x in 0..6 {
        digit_runs(d[1 + x], (parity >> (5 - x)) & 1 == 1, &mut runs);
    }
    runs.extend_from_slice(&[1, 1, 1, 1, 1]);
    for &digit in &d[7..13] {
        digit_runs(digit, false, &mut runs);
    }
    runs.extend_from_slice(&[1, 1, 1]);
    runs
}

/// EAN-8 symbol for an 8-digit string with a valid check digit
pub(crate) fn ean8_runs(digits: &str) -> Vec<usize> {
    let d = digits.as_bytes();
    let mut runs = vec![1, 1, 1];
    for &digit in &d[..4] {
        digit_runs(digit, false, &mut runs);
    }
    runs.extend_from_slice(&[1, 1, 1, 1, 1]);
    for &digit in &d[4..8] {
        digit_runs(digit, false, &mut runs);
    }
    runs.extend_from_slice(&[1, 1, 1]);
    runs
}

/// UPC-E symbol for an 8-digit string (number system, six digits, check)
pub(crate) fn upce_runs(digits: &str) -> Vec<usize> {
    let d = digits.as_bytes();
    let num_sys = (d[0] - b'0') as usize;
    let check = (d[7] - b'0') as usize;
    let parity = NUMSYS_AND_CHECK_DIGIT_PATTERNS[num_sys][check];
    let mut runs = vec![1, 1, 1];
    for x in 0..6 {
        digit_runs(d[1 + x], (parity >> (5 - x)) & 1 == 1, &mut runs);
    }
    runs.extend_from_slice(&[1, 1, 1, 1, 1, 1]);
    runs
}
