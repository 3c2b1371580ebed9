use encoding_rs::SHIFT_JIS;

use super::types::{Mode, Segment};
use crate::common::bit_utils::BitStream;
use crate::common::error::{QRError, QRResult};

// Predicates
//------------------------------------------------------------------------------

/// True if every character is a decimal digit. Empty text qualifies.
pub fn is_numeric(text: &str) -> bool {
    text.bytes().all(|b| Mode::Numeric.contains(b))
}

/// True if every character is in the 45 character alphanumeric set. Empty text qualifies.
pub fn is_alphanumeric(text: &str) -> bool {
    text.bytes().all(|b| Mode::Alphanumeric.contains(b))
}

/// True if every character maps to a double byte Shift JIS code in the kanji
/// ranges 0x8140-0x9FFC or 0xE040-0xEBBF.
pub fn is_kanji(text: &str) -> bool {
    shift_jis_kanji_codes(text).is_some()
}

fn shift_jis_kanji_codes(text: &str) -> Option<Vec<u16>> {
    let (encoded, _, had_errors) = SHIFT_JIS.encode(text);
    if had_errors || encoded.len() % 2 != 0 {
        return None;
    }
    let codes = encoded
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect::<Vec<_>>();
    let valid = codes.len() == text.chars().count()
        && codes.iter().all(|&c| matches!(c, 0x8140..=0x9FFC | 0xE040..=0xEBBF));
    valid.then_some(codes)
}

#[cfg(test)]
mod predicate_tests {
    use test_case::test_case;

    use super::{is_alphanumeric, is_kanji, is_numeric};

    #[test_case("", true, true)]
    #[test_case("0", true, true)]
    #[test_case("A", false, true)]
    #[test_case("a", false, false)]
    #[test_case(" ", false, true)]
    #[test_case(".", false, true)]
    #[test_case("*", false, true)]
    #[test_case(",", false, false)]
    #[test_case("|", false, false)]
    #[test_case("@", false, false)]
    #[test_case("XYZ", false, true)]
    #[test_case("XYZ!", false, false)]
    #[test_case("79068", true, true)]
    #[test_case("+123 ABC$", false, true)]
    #[test_case("\x01", false, false)]
    #[test_case("\x7F", false, false)]
    #[test_case("\u{80}", false, false)]
    #[test_case("\u{C0}", false, false)]
    #[test_case("\u{FF}", false, false)]
    fn test_predicates(text: &str, numeric: bool, alphanumeric: bool) {
        assert_eq!(is_numeric(text), numeric);
        assert_eq!(is_alphanumeric(text), alphanumeric);
    }

    #[test]
    fn test_is_kanji() {
        assert!(is_kanji("点茗"));
        assert!(is_kanji(""));
        assert!(!is_kanji("A"));
        assert!(!is_kanji("点A"));
        assert!(!is_kanji("ｱ"));
    }
}

// Segment construction
//------------------------------------------------------------------------------

impl Segment {
    /// Numeric segment from a digit string.
    ///
    /// # Panics
    ///
    /// Panics if `digits` contains anything but ASCII digits. Check with [`is_numeric`].
    pub fn numeric(digits: &str) -> Self {
        assert!(is_numeric(digits), "String contains non-numeric characters");

        let bytes = digits.as_bytes();
        let mut data = BitStream::new(Mode::Numeric.encoded_len(bytes.len()));
        for chunk in bytes.chunks(3) {
            let len = chunk.len() * 3 + 1;
            let n = chunk.iter().fold(0_u16, |n, b| n * 10 + Mode::numeric_digit(*b));
            data.push_bits(n, len);
        }
        Self { mode: Mode::Numeric, char_cnt: bytes.len(), data }
    }

    /// Alphanumeric segment from uppercase letters, digits and ` $%*+-./:`.
    ///
    /// # Panics
    ///
    /// Panics on characters outside the alphanumeric set. Check with [`is_alphanumeric`].
    pub fn alphanumeric(text: &str) -> Self {
        assert!(is_alphanumeric(text), "String contains non-alphanumeric characters");

        let bytes = text.as_bytes();
        let mut data = BitStream::new(Mode::Alphanumeric.encoded_len(bytes.len()));
        for chunk in bytes.chunks(2) {
            let len = chunk.len() * 5 + 1;
            let n = chunk.iter().fold(0_u16, |n, b| n * 45 + Mode::alphanumeric_digit(*b));
            data.push_bits(n, len);
        }
        Self { mode: Mode::Alphanumeric, char_cnt: bytes.len(), data }
    }

    pub fn bytes(bytes: &[u8]) -> Self {
        let mut data = BitStream::new(Mode::Byte.encoded_len(bytes.len()));
        for &b in bytes {
            data.push_bits(b, 8);
        }
        Self { mode: Mode::Byte, char_cnt: bytes.len(), data }
    }

    /// Kanji segment from text whose characters all have double byte Shift JIS codes.
    ///
    /// # Panics
    ///
    /// Panics if any character is not a kanji-class Shift JIS character. Check with
    /// [`is_kanji`].
    pub fn kanji(text: &str) -> Self {
        let codes = match shift_jis_kanji_codes(text) {
            Some(codes) => codes,
            None => panic!("String contains non-kanji characters"),
        };

        let mut data = BitStream::new(Mode::Kanji.encoded_len(codes.len()));
        for &code in &codes {
            let base = if code <= 0x9FFC { code - 0x8140 } else { code - 0xC140 };
            let n = (base >> 8) * 0xC0 + (base & 0xFF);
            data.push_bits(n, 13);
        }
        Self { mode: Mode::Kanji, char_cnt: codes.len(), data }
    }

    /// Extended channel interpretation designator. Carries no characters.
    pub fn eci(assign_val: u32) -> QRResult<Self> {
        let mut data = BitStream::new(24);
        if assign_val < 1 << 7 {
            data.push_bits(assign_val, 8);
        } else if assign_val < 1 << 14 {
            data.push_bits(0b10u8, 2);
            data.push_bits(assign_val, 14);
        } else if assign_val < 1_000_000 {
            data.push_bits(0b110u8, 3);
            data.push_bits(assign_val, 21);
        } else {
            return Err(QRError::EciOutOfRange(assign_val));
        }
        Ok(Self { mode: Mode::Eci, char_cnt: 0, data })
    }
}

/// Picks a single segment for the whole input: numeric if every character is a
/// digit, else alphanumeric if every character is in that set, else byte.
pub fn make_segments(text: &str) -> Vec<Segment> {
    if text.is_empty() {
        Vec::new()
    } else if is_numeric(text) {
        vec![Segment::numeric(text)]
    } else if is_alphanumeric(text) {
        vec![Segment::alphanumeric(text)]
    } else {
        vec![Segment::bytes(text.as_bytes())]
    }
}

#[cfg(test)]
mod segment_tests {
    use test_case::test_case;

    use super::{make_segments, Mode, Segment};
    use crate::common::error::QRError;

    fn bits(seg: &Segment) -> Vec<u8> {
        seg.data().bits().map(u8::from).collect()
    }

    #[test_case("", 0, vec![])]
    #[test_case("9", 4, vec![1, 0, 0, 1])]
    #[test_case("81", 7, vec![1, 0, 1, 0, 0, 0, 1])]
    #[test_case("673", 10, vec![1, 0, 1, 0, 1, 0, 0, 0, 0, 1])]
    #[test_case("3141592653", 34, vec![0, 1, 0, 0, 1, 1, 1, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 1, 1, 1, 0, 1, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 1, 1])]
    fn test_numeric(text: &str, bit_len: usize, exp: Vec<u8>) {
        let seg = Segment::numeric(text);
        assert_eq!(seg.mode(), Mode::Numeric);
        assert_eq!(seg.char_count(), text.len());
        assert_eq!(seg.bit_len(), bit_len);
        assert_eq!(bits(&seg), exp);
    }

    #[test]
    #[should_panic]
    fn test_numeric_invalid() {
        Segment::numeric("12a");
    }

    #[test_case("", 0, vec![])]
    #[test_case("A", 6, vec![0, 0, 1, 0, 1, 0])]
    #[test_case("%:", 11, vec![1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 0])]
    #[test_case("Q R", 17, vec![1, 0, 0, 1, 0, 1, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 1])]
    fn test_alphanumeric(text: &str, bit_len: usize, exp: Vec<u8>) {
        let seg = Segment::alphanumeric(text);
        assert_eq!(seg.mode(), Mode::Alphanumeric);
        assert_eq!(seg.char_count(), text.len());
        assert_eq!(seg.bit_len(), bit_len);
        assert_eq!(bits(&seg), exp);
    }

    #[test]
    fn test_alphanumeric_packed() {
        let seg = Segment::alphanumeric("AC-42");
        assert_eq!(seg.data().data(), [0b00111001, 0b11011100, 0b11100100, 0b00100000]);
    }

    #[test]
    #[should_panic]
    fn test_alphanumeric_invalid() {
        Segment::alphanumeric("abc");
    }

    #[test]
    fn test_bytes() {
        let seg = Segment::bytes(&[]);
        assert_eq!((seg.mode(), seg.char_count(), seg.bit_len()), (Mode::Byte, 0, 0));

        let seg = Segment::bytes(&[0x00]);
        assert_eq!((seg.char_count(), seg.bit_len()), (1, 8));
        assert_eq!(bits(&seg), [0; 8]);

        let seg = Segment::bytes(&[0xEF, 0xBB, 0xBF]);
        assert_eq!((seg.char_count(), seg.bit_len()), (3, 24));
        assert_eq!(
            bits(&seg),
            [1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1]
        );
    }

    #[test]
    fn test_kanji() {
        // 0x935F -> 0x0D9F, 0xE4AA -> 0x1AAA
        let seg = Segment::kanji("点茗");
        assert_eq!(seg.mode(), Mode::Kanji);
        assert_eq!(seg.char_count(), 2);
        assert_eq!(seg.bit_len(), 26);
        let mut exp = vec![];
        for n in [0x0D9F_u16, 0x1AAA] {
            exp.extend((0..13).rev().map(|i| ((n >> i) & 1) as u8));
        }
        assert_eq!(bits(&seg), exp);
    }

    #[test]
    #[should_panic]
    fn test_kanji_invalid() {
        Segment::kanji("kanji");
    }

    #[test_case(127, 8, vec![0, 1, 1, 1, 1, 1, 1, 1])]
    #[test_case(0, 8, vec![0, 0, 0, 0, 0, 0, 0, 0])]
    #[test_case(128, 16, vec![1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0])]
    #[test_case(16383, 16, vec![1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1])]
    #[test_case(16384, 24, vec![1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])]
    #[test_case(10345, 16, vec![1, 0, 1, 0, 1, 0, 0, 0, 0, 1, 1, 0, 1, 0, 0, 1])]
    #[test_case(999999, 24, vec![1, 1, 0, 0, 1, 1, 1, 1, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 1, 1, 1, 1, 1, 1])]
    fn test_eci(val: u32, bit_len: usize, exp: Vec<u8>) {
        let seg = Segment::eci(val).unwrap();
        assert_eq!(seg.mode(), Mode::Eci);
        assert_eq!(seg.char_count(), 0);
        assert_eq!(seg.bit_len(), bit_len);
        assert_eq!(bits(&seg), exp);
    }

    #[test]
    fn test_eci_out_of_range() {
        assert_eq!(Segment::eci(1_000_000), Err(QRError::EciOutOfRange(1_000_000)));
    }

    #[test_case("", &[])]
    #[test_case("0123456789", &[Mode::Numeric])]
    #[test_case("SUDOKU://", &[Mode::Alphanumeric])]
    #[test_case("Hello, world!", &[Mode::Byte])]
    #[test_case("点", &[Mode::Byte])]
    fn test_make_segments(text: &str, exp_modes: &[Mode]) {
        let modes = make_segments(text).iter().map(Segment::mode).collect::<Vec<_>>();
        assert_eq!(modes, exp_modes);
    }
}
