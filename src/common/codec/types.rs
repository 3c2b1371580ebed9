use crate::common::bit_utils::BitStream;
use crate::common::metadata::Version;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Kanji = 0b1000,
    Eci = 0b0111,
}

impl Mode {
    /// 4 bit mode indicator.
    pub const fn indicator(self) -> u8 {
        self as u8
    }

    /// Width of the character count field for version ranges [1-9], [10-26], [27-40].
    pub const fn char_cnt_bits_table(self) -> [usize; 3] {
        match self {
            Self::Numeric => [10, 12, 14],
            Self::Alphanumeric => [9, 11, 13],
            Self::Byte => [8, 16, 16],
            Self::Kanji => [8, 10, 12],
            Self::Eci => [0, 0, 0],
        }
    }

    pub fn char_cnt_bits(self, ver: Version) -> usize {
        self.char_cnt_bits_table()[ver.range_index()]
    }

    #[inline]
    pub(crate) fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    pub(crate) fn alphanumeric_digit(char: u8) -> u16 {
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
            Self::Kanji | Self::Eci => false,
        }
    }

    /// Payload bit length for `len` characters.
    pub(crate) fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
            Self::Kanji => len * 13,
            Self::Eci => unreachable!("ECI payload length depends on the assignment value"),
        }
    }
}


// Segment
//------------------------------------------------------------------------------

/// One mode tagged chunk of input with its packed payload bits.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Segment {
    pub(crate) mode: Mode,
    // Unencoded length: digits, characters, bytes or kanji
    pub(crate) char_cnt: usize,
    pub(crate) data: BitStream,
}

impl Segment {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn char_count(&self) -> usize {
        self.char_cnt
    }

    pub fn data(&self) -> &BitStream {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
impl Segment {
    // Segment with a zeroed payload of the given bit length
    pub(crate) fn dummy(mode: Mode, char_cnt: usize, bit_len: usize) -> Self {
        let mut data = BitStream::new(bit_len);
        (0..bit_len).for_each(|_| data.push(false));
        Self { mode, char_cnt, data }
    }
}
