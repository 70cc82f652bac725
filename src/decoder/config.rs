use crate::models::BarcodeFormat;
use std::sync::OnceLock;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

fn parse_env_formats(name: &str) -> Option<Vec<BarcodeFormat>> {
    let raw = std::env::var(name).ok()?;
    let formats: Vec<BarcodeFormat> = raw
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    if formats.is_empty() {
        None
    } else {
        Some(formats)
    }
}

static MAX_SCAN_LINES: OnceLock<usize> = OnceLock::new();

/// Rows visited per image when not trying harder (`ONED_MAX_SCAN_LINES`)
pub(crate) fn max_scan_lines() -> usize {
    *MAX_SCAN_LINES.get_or_init(|| parse_env_usize("ONED_MAX_SCAN_LINES", 15).clamp(1, 256))
}

/// ITF payload lengths accepted when none are configured
pub const DEFAULT_ITF_LENGTHS: [usize; 5] = [6, 8, 10, 12, 14];

/// Caller preferences for a decode
///
/// The same value is used to build a [`MultiFormatRowDecoder`] and is passed
/// again on every `decode_row` call.
///
/// [`MultiFormatRowDecoder`]: crate::decoder::multi_format::MultiFormatRowDecoder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Symbologies of interest; `None` and an empty list both mean "any"
    pub possible_formats: Option<Vec<BarcodeFormat>>,
    /// Validate and strip a trailing mod-43 check digit on Code 39
    pub assume_code39_check_digit: bool,
    /// Spend more time: scan every row and retry on the rotated image
    pub try_harder: bool,
    /// Accepted ITF payload lengths, defaults to [`DEFAULT_ITF_LENGTHS`]
    pub allowed_itf_lengths: Option<Vec<usize>>,
}

impl DecodeConfig {
    /// Config with no preferences
    pub fn new() -> Self {
        Self::default()
    }

    /// Read preferences from `ONED_FORMATS`, `ONED_CODE39_CHECK_DIGIT` and
    /// `ONED_TRY_HARDER`
    pub fn from_env() -> Self {
        Self {
            possible_formats: parse_env_formats("ONED_FORMATS"),
            assume_code39_check_digit: parse_env_bool_u8("ONED_CODE39_CHECK_DIGIT", false),
            try_harder: parse_env_bool_u8("ONED_TRY_HARDER", false),
            allowed_itf_lengths: None,
        }
    }

    /// Restrict decoding to `formats`
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = BarcodeFormat>) -> Self {
        self.possible_formats = Some(formats.into_iter().collect());
        self
    }

    /// Toggle Code 39 check digit handling
    pub fn with_code39_check_digit(mut self, enabled: bool) -> Self {
        self.assume_code39_check_digit = enabled;
        self
    }

    /// Toggle try-harder scanning
    pub fn with_try_harder(mut self, enabled: bool) -> Self {
        self.try_harder = enabled;
        self
    }

    /// Override accepted ITF lengths
    pub fn with_itf_lengths(mut self, lengths: impl IntoIterator<Item = usize>) -> Self {
        self.allowed_itf_lengths = Some(lengths.into_iter().collect());
        self
    }

    /// Requested formats, or `None` when the caller has no preference
    pub fn requested_formats(&self) -> Option<&[BarcodeFormat]> {
        self.possible_formats
            .as_deref()
            .filter(|formats| !formats.is_empty())
    }

    /// Whether `format` is acceptable (always true without a preference)
    pub fn wants(&self, format: BarcodeFormat) -> bool {
        self.requested_formats()
            .is_none_or(|formats| formats.contains(&format))
    }

    /// Whether `format` was explicitly requested
    pub fn requests(&self, format: BarcodeFormat) -> bool {
        self.requested_formats()
            .is_some_and(|formats| formats.contains(&format))
    }

    /// ITF lengths in effect
    pub fn itf_lengths(&self) -> &[usize] {
        self.allowed_itf_lengths
            .as_deref()
            .unwrap_or(&DEFAULT_ITF_LENGTHS)
    }
}
