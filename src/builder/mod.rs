mod qr;

pub use qr::QRCode;
pub(crate) use qr::QR;
#[cfg(test)]
pub(crate) use qr::Module;

use tracing::debug;

use crate::common::{
    codec::{boost_ec_level, encode_data, find_min_version, make_segments, Segment},
    ec::add_ecc_and_interleave,
    error::{QRError, QRResult},
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
    tables::Tables,
};

// Encode options
//------------------------------------------------------------------------------

/// Every knob of an encode besides the requested error correction level.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct EncodeOptions {
    /// Fixed mask in [0, 7], or `None` to pick the lowest penalty mask.
    pub mask: Option<u8>,
    /// Raise the level as far as the chosen version still fits the data.
    pub boost_ecl: bool,
    pub min_version: u8,
    pub max_version: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { mask: None, boost_ecl: true, min_version: *Version::MIN, max_version: *Version::MAX }
    }
}

impl EncodeOptions {
    pub fn validate(&self) -> QRResult<()> {
        self.version_range()?;
        self.mask_pattern()?;
        Ok(())
    }

    pub(crate) fn version_range(&self) -> QRResult<(Version, Version)> {
        let (min, max) = (self.min_version, self.max_version);
        match (Version::new(min), Version::new(max)) {
            (Some(lo), Some(hi)) if lo <= hi => Ok((lo, hi)),
            _ => Err(QRError::InvalidVersionRange { min, max }),
        }
    }

    pub(crate) fn mask_pattern(&self) -> QRResult<Option<MaskPattern>> {
        self.mask.map(MaskPattern::new).transpose()
    }
}


// Builder
//------------------------------------------------------------------------------

pub struct QRBuilder {
    segments: Vec<Segment>,
    ec_level: ECLevel,
    options: EncodeOptions,
}

impl QRBuilder {
    /// Builder over `data`, split with [`make_segments`] when it is valid UTF-8 and
    /// kept as one byte segment otherwise.
    pub fn new(data: &[u8]) -> Self {
        let segments = match std::str::from_utf8(data) {
            Ok(text) => make_segments(text),
            Err(_) => vec![Segment::bytes(data)],
        };
        Self::from_segments(segments)
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments, ec_level: ECLevel::L, options: EncodeOptions::default() }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: u8) -> &mut Self {
        self.options.mask = Some(mask);
        self
    }

    pub fn auto_mask(&mut self) -> &mut Self {
        self.options.mask = None;
        self
    }

    pub fn boost_ecl(&mut self, boost_ecl: bool) -> &mut Self {
        self.options.boost_ecl = boost_ecl;
        self
    }

    pub fn min_version(&mut self, min_version: u8) -> &mut Self {
        self.options.min_version = min_version;
        self
    }

    pub fn max_version(&mut self, max_version: u8) -> &mut Self {
        self.options.max_version = max_version;
        self
    }

    pub fn options(&mut self, options: EncodeOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn metadata(&self) -> String {
        format!(
            "{{ Ec level: {:?}, Versions: {}-{}, Mask: {:?}, Boost: {} }}",
            self.ec_level,
            self.options.min_version,
            self.options.max_version,
            self.options.mask,
            self.options.boost_ecl
        )
    }
}


impl QRBuilder {
    pub fn build(&self) -> QRResult<QRCode> {
        self.build_with(Tables::global())
    }

    pub fn build_with(&self, tables: &Tables) -> QRResult<QRCode> {
        debug!("Generating QR {}", self.metadata());
        encode_segments_with(&self.segments, self.ec_level, &self.options, tables)
    }
}

// Encode entry points
//------------------------------------------------------------------------------

/// Encodes text at `ecl` or above with default options, picking numeric,
/// alphanumeric or byte mode for the whole text.
pub fn encode_text(text: &str, ecl: ECLevel) -> QRResult<QRCode> {
    encode_segments(&make_segments(text), ecl, &EncodeOptions::default())
}

/// Encodes raw bytes as one byte segment with default options.
pub fn encode_binary(data: &[u8], ecl: ECLevel) -> QRResult<QRCode> {
    encode_segments(&[Segment::bytes(data)], ecl, &EncodeOptions::default())
}

pub fn encode_segments(segs: &[Segment], ecl: ECLevel, opts: &EncodeOptions) -> QRResult<QRCode> {
    encode_segments_with(segs, ecl, opts, Tables::global())
}

fn encode_segments_with(
    segs: &[Segment],
    ecl: ECLevel,
    opts: &EncodeOptions,
    tables: &Tables,
) -> QRResult<QRCode> {
    let (min, max) = opts.version_range()?;
    let mask = opts.mask_pattern()?;

    let (ver, used_bits) = find_min_version(segs, ecl, min, max, tables)?;
    let ecl = if opts.boost_ecl { boost_ec_level(used_bits, ver, ecl, tables) } else { ecl };
    debug!(version = *ver, ec_level = ?ecl, bits = used_bits, "Chose version");

    let data = encode_data(segs, ver, ecl, used_bits, tables);
    let codewords = add_ecc_and_interleave(&data, ver, ecl, tables);

    let mut qr = QR::new(ver, ecl);
    qr.draw_all_function_patterns(tables);
    qr.draw_version_info();
    qr.reserve_format_area();
    qr.draw_codewords(&codewords);

    let mask = match mask {
        Some(m) => {
            qr.apply_mask(m);
            m
        }
        None => apply_best_mask(&mut qr),
    };
    debug!(mask = *mask, "Applied mask");

    Ok(QRCode::from(qr))
}
