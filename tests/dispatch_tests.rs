//! Integration tests for format dispatch through the public API
//!
//! Rows are synthesised in `common`; custom decoders stand in for
//! symbologies where call order or reset behaviour is under test.

mod common;

use rust_oned::{
    Barcode, BarcodeFormat, BitArray, DecodeConfig, DecodeError, DecoderKind, MultiFormatRowDecoder,
    RowDecoder,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts calls and resets; succeeds only when `hit` is set
struct Probe {
    label: &'static str,
    hit: bool,
    calls: Arc<AtomicUsize>,
    resets: Arc<AtomicUsize>,
}

impl Probe {
    fn boxed(label: &'static str, hit: bool) -> (Box<dyn RowDecoder>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let resets = Arc::new(AtomicUsize::new(0));
        let probe = Probe {
            label,
            hit,
            calls: Arc::clone(&calls),
            resets: Arc::clone(&resets),
        };
        (Box::new(probe), calls, resets)
    }
}

impl RowDecoder for Probe {
    fn decode_row(
        &mut self,
        row_number: usize,
        _row: &BitArray,
        _config: &DecodeConfig,
    ) -> Result<Barcode, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hit {
            Ok(Barcode::new(BarcodeFormat::Code128, self.label.to_string(), row_number, 0.0, 1.0))
        } else {
            Err(DecodeError::Checksum)
        }
    }

    fn reset(&mut self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

fn code39_row(text: &str) -> BitArray {
    common::row(&common::code39(text), 2, 30)
}

#[test]
fn test_default_registry_order() {
    let expected = vec![
        DecoderKind::Code39 { check_digit: false },
        DecoderKind::UpcEan,
        DecoderKind::Code128,
        DecoderKind::Itf,
    ];
    assert_eq!(MultiFormatRowDecoder::new(None).kinds(), expected);
    assert_eq!(MultiFormatRowDecoder::default().kinds(), expected);
}

#[test]
fn test_requested_formats_use_hint_order() {
    let config = DecodeConfig::new()
        .with_formats([BarcodeFormat::Itf, BarcodeFormat::Code128, BarcodeFormat::UpcE, BarcodeFormat::Code39])
        .with_code39_check_digit(true);
    assert_eq!(
        MultiFormatRowDecoder::new(Some(&config)).kinds(),
        vec![
            DecoderKind::UpcEan,
            DecoderKind::Code39 { check_digit: true },
            DecoderKind::Code128,
            DecoderKind::Itf,
        ]
    );
}

#[test]
fn test_unsupported_formats_fall_back_to_default() {
    let config = DecodeConfig::new().with_formats([BarcodeFormat::QrCode, BarcodeFormat::Codabar]);
    let mut hinted = MultiFormatRowDecoder::new(Some(&config));
    let mut default = MultiFormatRowDecoder::new(None);
    assert_eq!(hinted.kinds(), default.kinds());

    let row = code39_row("SAME");
    assert_eq!(
        hinted.decode_row(4, &row, &config),
        default.decode_row(4, &row, &DecodeConfig::new())
    );
}

#[test]
fn test_code39_row_decodes_with_default_registry() {
    let mut decoder = MultiFormatRowDecoder::new(None);
    let barcode = decoder
        .decode_row(9, &code39_row("HELLO 39"), &DecodeConfig::new())
        .unwrap();
    assert_eq!(barcode.format, BarcodeFormat::Code39);
    assert_eq!(barcode.text, "HELLO 39");
    assert_eq!(barcode.row, 9);
    assert_eq!(barcode.metadata.symbology_identifier.as_deref(), Some("]A0"));
}

#[test]
fn test_code128_only_registry_rejects_code39() {
    let config = DecodeConfig::new().with_formats([BarcodeFormat::Code128]);
    let mut decoder = MultiFormatRowDecoder::new(Some(&config));
    assert_eq!(decoder.kinds(), vec![DecoderKind::Code128]);
    assert_eq!(
        decoder.decode_row(0, &code39_row("NOT128"), &config),
        Err(DecodeError::NotFound)
    );
}

#[test]
fn test_code39_check_digit_follows_config() {
    // C=12 O=24 D=13 E=14 3=3 9=9, sum 75, 75 mod 43 = 32 -> 'W'
    let row = code39_row("CODE39W");

    let plain = DecodeConfig::new().with_formats([BarcodeFormat::Code39]);
    let barcode = MultiFormatRowDecoder::new(Some(&plain))
        .decode_row(0, &row, &plain)
        .unwrap();
    assert_eq!(barcode.text, "CODE39W");

    let checked = plain.clone().with_code39_check_digit(true);
    let barcode = MultiFormatRowDecoder::new(Some(&checked))
        .decode_row(0, &row, &checked)
        .unwrap();
    assert_eq!(barcode.text, "CODE39");
    assert_eq!(barcode.metadata.symbology_identifier.as_deref(), Some("]A3"));
}

#[test]
fn test_ean13_and_upca_reporting() {
    let row = common::row(&common::ean13("0036000291452"), 2, 24);

    let mut any = MultiFormatRowDecoder::new(None);
    let barcode = any.decode_row(0, &row, &DecodeConfig::new()).unwrap();
    assert_eq!(barcode.format, BarcodeFormat::UpcA);
    assert_eq!(barcode.text, "036000291452");

    let ean_only = DecodeConfig::new().with_formats([BarcodeFormat::Ean13]);
    let barcode = MultiFormatRowDecoder::new(Some(&ean_only))
        .decode_row(0, &row, &ean_only)
        .unwrap();
    assert_eq!(barcode.format, BarcodeFormat::Ean13);
    assert_eq!(barcode.text, "0036000291452");
}

#[test]
fn test_all_decoders_fail_on_noise_rows() {
    let config = DecodeConfig::new();
    let mut decoder = MultiFormatRowDecoder::new(None);
    let white = BitArray::new(300);
    let mut black = BitArray::new(300);
    black.set_range(0, 300, true);
    let stripes = BitArray::from_bools(&(0..300).map(|i| i % 2 == 0).collect::<Vec<_>>());
    for row in [&white, &black, &stripes] {
        assert_eq!(decoder.decode_row(0, row, &config), Err(DecodeError::NotFound));
    }
}

#[test]
fn test_first_match_wins() {
    let (miss, miss_calls, _) = Probe::boxed("miss", false);
    let (first, first_calls, _) = Probe::boxed("first", true);
    let (second, second_calls, _) = Probe::boxed("second", true);
    let mut decoder = MultiFormatRowDecoder::with_decoders(vec![miss, first, second]);
    assert_eq!(decoder.kinds(), vec![DecoderKind::Custom; 3]);

    let barcode = decoder
        .decode_row(3, &BitArray::new(10), &DecodeConfig::new())
        .unwrap();
    assert_eq!(barcode.text, "first");
    assert_eq!(miss_calls.load(Ordering::SeqCst), 1);
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failures_collapse_to_not_found() {
    let (a, _, _) = Probe::boxed("a", false);
    let (b, b_calls, _) = Probe::boxed("b", false);
    let mut decoder = MultiFormatRowDecoder::with_decoders(vec![a, b]);
    assert_eq!(
        decoder.decode_row(0, &BitArray::new(10), &DecodeConfig::new()),
        Err(DecodeError::NotFound)
    );
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reset_reaches_every_decoder() {
    let (a, _, a_resets) = Probe::boxed("a", false);
    let (b, _, b_resets) = Probe::boxed("b", true);
    let mut decoder = MultiFormatRowDecoder::with_decoders(vec![a, b]);
    decoder.reset();
    decoder.reset();
    assert_eq!(a_resets.load(Ordering::SeqCst), 2);
    assert_eq!(b_resets.load(Ordering::SeqCst), 2);
}

#[test]
fn test_empty_custom_list_uses_default_registry() {
    let decoder = MultiFormatRowDecoder::with_decoders(Vec::new());
    assert_eq!(decoder.kinds(), MultiFormatRowDecoder::default_registry().kinds());
    assert!(!decoder.is_empty());
}
