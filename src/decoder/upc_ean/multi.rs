use super::upca::ean13_to_upca;
use super::{Ean8Reader, Ean13Reader, UpcAReader, UpcEReader, UpcEanReader, find_start_guard_pattern};
use crate::decoder::config::DecodeConfig;
use crate::decoder::error::DecodeError;
use crate::decoder::row_decoder::RowDecoder;
use crate::models::{Barcode, BarcodeFormat, BitArray};

/// All requested UPC/EAN members behind one start-guard search
pub struct MultiFormatUpcEanReader {
    readers: Vec<Box<dyn UpcEanReader>>,
    can_return_upca: bool,
}

impl MultiFormatUpcEanReader {
    /// Build the member list from the requested formats
    ///
    /// EAN-13 covers UPC-A, so a UPC-A reader is only added when EAN-13 was
    /// not requested. Without a usable preference the EAN-13, EAN-8 and UPC-E
    /// readers are installed.
    ///
    /// Whether leading-zero EAN-13 results are relabelled as UPC-A is fixed
    /// here: only a request naming family members but not UPC-A turns it off.
    pub fn new(config: Option<&DecodeConfig>) -> Self {
        let mut readers: Vec<Box<dyn UpcEanReader>> = Vec::with_capacity(3);
        let mut can_return_upca = true;
        if let Some(config) = config {
            if config.requests(BarcodeFormat::Ean13) {
                readers.push(Box::new(Ean13Reader::new()));
            } else if config.requests(BarcodeFormat::UpcA) {
                readers.push(Box::new(UpcAReader::new()));
            }
            if config.requests(BarcodeFormat::Ean8) {
                readers.push(Box::new(Ean8Reader::new()));
            }
            if config.requests(BarcodeFormat::UpcE) {
                readers.push(Box::new(UpcEReader::new()));
            }
            can_return_upca = readers.is_empty() || config.requests(BarcodeFormat::UpcA);
        }
        if readers.is_empty() {
            readers.push(Box::new(Ean13Reader::new()));
            readers.push(Box::new(Ean8Reader::new()));
            readers.push(Box::new(UpcEReader::new()));
        }
        Self {
            readers,
            can_return_upca,
        }
    }

    /// Formats of the installed members, in trial order
    pub fn formats(&self) -> Vec<BarcodeFormat> {
        self.readers.iter().map(|reader| reader.format()).collect()
    }
}

impl RowDecoder for MultiFormatUpcEanReader {
    fn decode_row(
        &mut self,
        row_number: usize,
        row: &BitArray,
        _config: &DecodeConfig,
    ) -> Result<Barcode, DecodeError> {
        let start_range = find_start_guard_pattern(row)?;
        for reader in &mut self.readers {
            let Ok(barcode) = reader.decode_row_with_start(row_number, row, start_range) else {
                continue;
            };
            // UPC-A is EAN-13 with a leading zero
            let may_be_upca =
                barcode.format == BarcodeFormat::Ean13 && barcode.text.starts_with('0');
            if may_be_upca && self.can_return_upca {
                return ean13_to_upca(barcode);
            }
            return Ok(barcode);
        }
        Err(DecodeError::NotFound)
    }

    fn reset(&mut self) {
        for reader in &mut self.readers {
            reader.reset();
        }
    }
}
