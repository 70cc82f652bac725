use std::fmt;
use std::str::FromStr;

/// Barcode symbology identifier
///
/// The set covers every symbology a caller may ask for; only the 1D subset
/// has a decoder in this crate, the rest are accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BarcodeFormat {
    /// Aztec 2D
    Aztec,
    /// Codabar 1D
    Codabar,
    /// Code 39 1D
    Code39,
    /// Code 93 1D
    Code93,
    /// Code 128 1D
    Code128,
    /// Data Matrix 2D
    DataMatrix,
    /// EAN-8 1D
    Ean8,
    /// EAN-13 1D
    Ean13,
    /// Interleaved 2 of 5 1D
    Itf,
    /// MaxiCode 2D
    MaxiCode,
    /// PDF417 stacked
    Pdf417,
    /// QR Code 2D
    QrCode,
    /// GS1 DataBar (RSS-14)
    Rss14,
    /// GS1 DataBar Expanded
    RssExpanded,
    /// UPC-A 1D
    UpcA,
    /// UPC-E 1D
    UpcE,
    /// UPC/EAN 2- or 5-digit add-on
    UpcEanExtension,
}

impl BarcodeFormat {
    /// Every variant, in declaration order
    pub const ALL: [BarcodeFormat; 17] = [
        BarcodeFormat::Aztec,
        BarcodeFormat::Codabar,
        BarcodeFormat::Code39,
        BarcodeFormat::Code93,
        BarcodeFormat::Code128,
        BarcodeFormat::DataMatrix,
        BarcodeFormat::Ean8,
        BarcodeFormat::Ean13,
        BarcodeFormat::Itf,
        BarcodeFormat::MaxiCode,
        BarcodeFormat::Pdf417,
        BarcodeFormat::QrCode,
        BarcodeFormat::Rss14,
        BarcodeFormat::RssExpanded,
        BarcodeFormat::UpcA,
        BarcodeFormat::UpcE,
        BarcodeFormat::UpcEanExtension,
    ];

    /// True for the four retail formats decoded by the UPC/EAN composite
    pub fn is_upc_ean(&self) -> bool {
        matches!(
            self,
            BarcodeFormat::Ean8 | BarcodeFormat::Ean13 | BarcodeFormat::UpcA | BarcodeFormat::UpcE
        )
    }

    /// Short kebab-case name, also accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            BarcodeFormat::Aztec => "aztec",
            BarcodeFormat::Codabar => "codabar",
            BarcodeFormat::Code39 => "code-39",
            BarcodeFormat::Code93 => "code-93",
            BarcodeFormat::Code128 => "code-128",
            BarcodeFormat::DataMatrix => "data-matrix",
            BarcodeFormat::Ean8 => "ean-8",
            BarcodeFormat::Ean13 => "ean-13",
            BarcodeFormat::Itf => "itf",
            BarcodeFormat::MaxiCode => "maxicode",
            BarcodeFormat::Pdf417 => "pdf-417",
            BarcodeFormat::QrCode => "qr-code",
            BarcodeFormat::Rss14 => "rss-14",
            BarcodeFormat::RssExpanded => "rss-expanded",
            BarcodeFormat::UpcA => "upc-a",
            BarcodeFormat::UpcE => "upc-e",
            BarcodeFormat::UpcEanExtension => "upc-ean-extension",
        }
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a format name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown barcode format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for BarcodeFormat {
    type Err = UnknownFormat;

    /// Parses kebab names case-insensitively; `_` and missing dashes are
    /// tolerated (`CODE_128`, `code128`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        BarcodeFormat::ALL
            .iter()
            .copied()
            .find(|f| f.name().replace('-', "") == wanted)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}
