//! Format dispatch over an ordered registry of row decoders
//!
//! The registry is built once from a [`DecodeConfig`] and then tried in order
//! on every row; the first decoder to succeed wins.

use crate::decoder::code39::Code39Reader;
use crate::decoder::code128::Code128Reader;
use crate::decoder::config::DecodeConfig;
use crate::decoder::error::DecodeError;
use crate::decoder::itf::ItfReader;
use crate::decoder::row_decoder::RowDecoder;
use crate::decoder::upc_ean::MultiFormatUpcEanReader;
use crate::models::{Barcode, BarcodeFormat, BitArray};

/// What a registry slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoderKind {
    /// Code 39, with or without check digit validation
    Code39 {
        /// Whether the trailing mod-43 check digit is validated and stripped
        check_digit: bool,
    },
    /// UPC/EAN family composite
    UpcEan,
    /// Code 128
    Code128,
    /// Interleaved 2 of 5
    Itf,
    /// Decoder supplied through [`MultiFormatRowDecoder::with_decoders`]
    Custom,
}

struct Entry {
    kind: DecoderKind,
    decoder: Box<dyn RowDecoder>,
}

impl Entry {
    fn new(kind: DecoderKind, decoder: Box<dyn RowDecoder>) -> Self {
        Self { kind, decoder }
    }

    fn code39(check_digit: bool) -> Self {
        Self::new(
            DecoderKind::Code39 { check_digit },
            Box::new(Code39Reader::with_check_digit(check_digit)),
        )
    }

    fn upc_ean(config: Option<&DecodeConfig>) -> Self {
        Self::new(DecoderKind::UpcEan, Box::new(MultiFormatUpcEanReader::new(config)))
    }

    fn code128() -> Self {
        Self::new(DecoderKind::Code128, Box::new(Code128Reader::new()))
    }

    fn itf() -> Self {
        Self::new(DecoderKind::Itf, Box::new(ItfReader::new()))
    }
}

/// Tries every registered decoder on a row until one succeeds
///
/// Owns its decoders exclusively; use one instance per thread.
pub struct MultiFormatRowDecoder {
    entries: Vec<Entry>,
}

impl MultiFormatRowDecoder {
    /// Build the registry for `config`
    ///
    /// Requested formats install, in this order: the UPC/EAN composite (once,
    /// for any family member), Code 39, Code 128 and ITF. Formats this crate
    /// cannot decode are skipped. When nothing was installed the
    /// [default registry](Self::default_registry) is used instead.
    pub fn new(config: Option<&DecodeConfig>) -> Self {
        let mut entries = Vec::with_capacity(4);
        if let Some(formats) = config.and_then(DecodeConfig::requested_formats) {
            if formats.iter().any(BarcodeFormat::is_upc_ean) {
                entries.push(Entry::upc_ean(config));
            }
            if formats.contains(&BarcodeFormat::Code39) {
                let check_digit = config.is_some_and(|c| c.assume_code39_check_digit);
                entries.push(Entry::code39(check_digit));
            }
            if formats.contains(&BarcodeFormat::Code128) {
                entries.push(Entry::code128());
            }
            if formats.contains(&BarcodeFormat::Itf) {
                entries.push(Entry::itf());
            }
        }
        if entries.is_empty() {
            return Self::default_registry();
        }
        Self { entries }
    }

    /// Baseline registry: Code 39 without check digit, UPC/EAN, Code 128, ITF
    pub fn default_registry() -> Self {
        Self {
            entries: vec![
                Entry::code39(false),
                Entry::upc_ean(None),
                Entry::code128(),
                Entry::itf(),
            ],
        }
    }

    /// Dispatch over caller-supplied decoders, tried in the given order
    ///
    /// An empty list gives the default registry.
    pub fn with_decoders(decoders: Vec<Box<dyn RowDecoder>>) -> Self {
        if decoders.is_empty() {
            return Self::default_registry();
        }
        Self {
            entries: decoders
                .into_iter()
                .map(|decoder| Entry::new(DecoderKind::Custom, decoder))
                .collect(),
        }
    }

    /// Registry slots in trial order
    pub fn kinds(&self) -> Vec<DecoderKind> {
        self.entries.iter().map(|entry| entry.kind).collect()
    }

    /// Number of registered decoders, never zero
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty, which construction never allows
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MultiFormatRowDecoder {
    fn default() -> Self {
        Self::default_registry()
    }
}

impl RowDecoder for MultiFormatRowDecoder {
    fn decode_row(
        &mut self,
        row_number: usize,
        row: &BitArray,
        config: &DecodeConfig,
    ) -> Result<Barcode, DecodeError> {
        // Any decoder failure only means "not this symbology"
        self.entries
            .iter_mut()
            .find_map(|entry| entry.decoder.decode_row(row_number, row, config).ok())
            .ok_or(DecodeError::NotFound)
    }

    fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.decoder.reset();
        }
    }
}
