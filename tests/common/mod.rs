//! Synthetic symbols for integration tests and benches
#![allow(dead_code)]

use rust_oned::BitArray;

const CODE39_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";
const CODE39_ENCODINGS: [u16; 43] = [
    0x034, 0x121, 0x061, 0x160, 0x031, 0x130, 0x070, 0x025, 0x124, 0x064, 0x109, 0x049, 0x148,
    0x019, 0x118, 0x058, 0x00D, 0x10C, 0x04C, 0x01C, 0x103, 0x043, 0x142, 0x013, 0x112, 0x052,
    0x007, 0x106, 0x046, 0x016, 0x181, 0x0C1, 0x1C0, 0x091, 0x190, 0x0D0, 0x085, 0x184, 0x0C4,
    0x0A8, 0x0A2, 0x08A, 0x02A,
];
const CODE39_ASTERISK: u16 = 0x094;

const EAN_L_PATTERNS: [[usize; 4]; 10] = [
    [3, 2, 1, 1],
    [2, 2, 2, 1],
    [2, 1, 2, 2],
    [1, 4, 1, 1],
    [1, 1, 3, 2],
    [1, 2, 3, 1],
    [1, 1, 1, 4],
    [1, 3, 1, 2],
    [1, 2, 1, 3],
    [3, 1, 1, 2],
];
const EAN13_PARITY: [u8; 10] = [0x00, 0x0B, 0x0D, 0x0E, 0x13, 0x19, 0x1C, 0x15, 0x16, 0x1A];

pub const WHITE: u8 = 235;
pub const BLACK: u8 = 15;

/// Alternating bar/space runs, scaled by `unit`, with `quiet` white pixels each side
pub fn row(runs: &[usize], unit: usize, quiet: usize) -> BitArray {
    let total = 2 * quiet + runs.iter().sum::<usize>() * unit;
    let mut row = BitArray::new(total);
    let mut pos = quiet;
    for (i, &run) in runs.iter().enumerate() {
        if i % 2 == 0 {
            row.set_range(pos, pos + run * unit, true);
        }
        pos += run * unit;
    }
    row
}

fn push_code39(encoding: u16, runs: &mut Vec<usize>) {
    runs.extend((0..9).map(|i| if (encoding >> (8 - i)) & 1 == 1 { 3 } else { 1 }));
}

/// Code 39 symbol including `*` start and stop
pub fn code39(content: &str) -> Vec<usize> {
    let mut runs = Vec::new();
    push_code39(CODE39_ASTERISK, &mut runs);
    for c in content.bytes() {
        let index = CODE39_ALPHABET
            .iter()
            .position(|&a| a == c)
            .expect("character outside the Code 39 alphabet");
        runs.push(1);
        push_code39(CODE39_ENCODINGS[index], &mut runs);
    }
    runs.push(1);
    push_code39(CODE39_ASTERISK, &mut runs);
    runs
}

/// EAN-13 symbol; `digits` must carry a valid check digit
pub fn ean13(digits: &str) -> Vec<usize> {
    let d: Vec<usize> = digits.bytes().map(|b| (b - b'0') as usize).collect();
    let parity = EAN13_PARITY[d[0]];
    let mut runs = vec![1, 1, 1];
    for (x, &digit) in d[1..7].iter().enumerate() {
        let pattern = EAN_L_PATTERNS[digit];
        if (parity >> (5 - x)) & 1 == 1 {
            runs.extend(pattern.iter().rev());
        } else {
            runs.extend_from_slice(&pattern);
        }
    }
    runs.extend_from_slice(&[1, 1, 1, 1, 1]);
    for &digit in &d[7..] {
        runs.extend_from_slice(&EAN_L_PATTERNS[digit]);
    }
    runs.extend_from_slice(&[1, 1, 1]);
    runs
}

/// Grayscale image with `row` painted on every line in `band`
pub fn banded_image(row: &BitArray, height: usize, band: std::ops::Range<usize>) -> Vec<u8> {
    let width = row.len();
    let mut gray = vec![WHITE; width * height];
    for y in band {
        for x in 0..width {
            if row.get(x) {
                gray[y * width + x] = BLACK;
            }
        }
    }
    gray
}

/// Grayscale image where every line carries `row`
pub fn striped_image(row: &BitArray, height: usize) -> Vec<u8> {
    banded_image(row, height, 0..height)
}
