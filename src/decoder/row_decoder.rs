//! Shared capability and run-length helpers for 1D row decoders

use crate::decoder::config::DecodeConfig;
use crate::decoder::error::DecodeError;
use crate::models::{Barcode, BitArray};

/// A decoder for one symbology (or a small family) working on a single row
///
/// This is the only extension point of the dispatcher: any type implementing
/// it can be registered in a [`MultiFormatRowDecoder`].
///
/// [`MultiFormatRowDecoder`]: crate::decoder::multi_format::MultiFormatRowDecoder
pub trait RowDecoder: Send {
    /// Try to decode a barcode from `row`.
    ///
    /// `row_number` is only reported back in the result.
    fn decode_row(
        &mut self,
        row_number: usize,
        row: &BitArray,
        config: &DecodeConfig,
    ) -> Result<Barcode, DecodeError>;

    /// Discard scratch state carried over from previous rows
    fn reset(&mut self) {}
}

/// Record the widths of consecutive runs starting at `start` into `counters`.
///
/// Succeeds when every counter was filled, or when the row ended while the
/// last counter was being filled.
pub fn record_pattern(
    row: &BitArray,
    start: usize,
    counters: &mut [usize],
) -> Result<(), DecodeError> {
    let num_counters = counters.len();
    counters.fill(0);
    let end = row.len();
    if start >= end || num_counters == 0 {
        return Err(DecodeError::NotFound);
    }

    let mut is_white = !row.get(start);
    let mut counter_position = 0;
    let mut i = start;
    while i < end {
        if row.get(i) != is_white {
            counters[counter_position] += 1;
        } else {
            counter_position += 1;
            if counter_position == num_counters {
                break;
            }
            counters[counter_position] = 1;
            is_white = !is_white;
        }
        i += 1;
    }

    let filled = counter_position == num_counters
        || (counter_position == num_counters - 1 && i == end);
    if filled {
        Ok(())
    } else {
        Err(DecodeError::NotFound)
    }
}

/// Average deviation of observed run widths from an ideal pattern, relative to
/// the total width. Returns `f32::INFINITY` when any single run deviates by more
/// than `max_individual_variance` units.
pub fn pattern_match_variance(
    counters: &[usize],
    pattern: &[usize],
    max_individual_variance: f32,
) -> f32 {
    let num_counters = counters.len().min(pattern.len());
    let total: usize = counters[..num_counters].iter().sum();
    let pattern_length: usize = pattern[..num_counters].iter().sum();
    if total < pattern_length || pattern_length == 0 {
        // Fewer pixels than modules: cannot resolve the pattern
        return f32::INFINITY;
    }

    let unit_bar_width = total as f32 / pattern_length as f32;
    let max_individual_variance = max_individual_variance * unit_bar_width;

    let mut total_variance = 0.0f32;
    for (&counter, &expected) in counters.iter().zip(pattern).take(num_counters) {
        let scaled = expected as f32 * unit_bar_width;
        let variance = (counter as f32 - scaled).abs();
        if variance > max_individual_variance {
            return f32::INFINITY;
        }
        total_variance += variance;
    }
    total_variance / total as f32
}
