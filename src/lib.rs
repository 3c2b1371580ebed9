//! # qrgen
//!
//! A Rust library for encoding text and binary data into QR Code symbols (ISO/IEC 18004),
//! versions 1 to 40, with Reed-Solomon error correction.
//!
//! ## Features
//!
//! - **Segment encoding**: Numeric, alphanumeric, byte, kanji and ECI segments, with a
//!   chooser that picks the densest single mode for plain text
//! - **Version selection**: Smallest version within a caller given range that fits the data
//! - **Error correction boost**: Raises the level as far as the chosen version still allows
//! - **Masking**: Fixed mask or automatic selection by the standard penalty rules
//!
//! ## Quick Start
//!
//! ```rust
//! use qrgen::{encode_text, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = encode_text("Hello, World!", ECLevel::M)?;
//! assert_eq!(qr.width(), *qr.version() as usize * 4 + 17);
//!
//! let row = (0..qr.width()).map(|c| if qr.is_dark(0, c) { '#' } else { ' ' }).collect::<String>();
//! assert!(row.starts_with("#######"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrgen::{QRBuilder, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"Hello, World!")
//!     .ec_level(ECLevel::Q)  // Requested level - if not provided, defaults to ECLevel::L
//!     .min_version(2)        // Version range - if not provided, searches 1 to 40
//!     .max_version(10)
//!     .mask(3)               // Mask pattern - if not provided, finds best mask by penalty score
//!     .boost_ecl(false)      // Keep the requested level even if a higher one fits
//!     .build()?;
//!
//! assert_eq!(*qr.version(), 2);
//! assert_eq!(*qr.mask(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ### Segments
//!
//! ```rust
//! use qrgen::{encode_segments, is_kanji, ECLevel, EncodeOptions, Segment};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut segs = vec![Segment::alphanumeric("SUDOKU://"), Segment::numeric("0123456789")];
//! if is_kanji("点茗") {
//!     segs.push(Segment::kanji("点茗"));
//! }
//! let qr = encode_segments(&segs, ECLevel::L, &EncodeOptions::default())?;
//! assert_eq!(*qr.version(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ## Logging
//!
//! Encoding emits [`tracing`] events: `debug` for the chosen version, level and mask, and
//! `trace` for per-mask penalty scores. No subscriber is installed by the library.

pub mod builder;
pub(crate) mod common;

pub use builder::{encode_binary, encode_segments, encode_text, EncodeOptions, QRBuilder, QRCode};
pub use common::bit_utils::BitStream;
pub use common::codec::{is_alphanumeric, is_kanji, is_numeric, make_segments, total_bits, Mode, Segment};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Version};
pub use common::tables::Tables;
