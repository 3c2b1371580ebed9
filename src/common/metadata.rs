use std::ops::{Deref, Not};

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Dark,
    Light,
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

// Version
//------------------------------------------------------------------------------

/// Size class of a QR symbol, in the range [1, 40].
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(ver: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0).contains(&ver).then_some(Self(ver))
    }

    pub(crate) const fn new_unchecked(ver: u8) -> Self {
        Self(ver)
    }

    pub fn all() -> impl Iterator<Item = Version> {
        (Self::MIN.0..=Self::MAX.0).map(Self)
    }

    pub const fn width(self) -> usize {
        self.0 as usize * 4 + 17
    }

    /// Index into per-version-range tables: [1-9], [10-26], [27-40].
    pub const fn range_index(self) -> usize {
        (self.0 as usize + 7) / 17
    }

    // 6 bit version number followed by a 12 bit BCH remainder
    pub fn info(self) -> u32 {
        debug_assert!(self.0 >= 7, "Version info only exists for version 7 and above");

        let ver = self.0 as u32;
        let mut rem = ver;
        for _ in 0..12 {
            rem = (rem << 1) ^ ((rem >> 11) * VERSION_INFO_POLY);
        }
        let info = ver << 12 | rem;
        assert!(info >> VERSION_INFO_BIT_LEN == 0, "Version info overflow: {info:#x}");
        info
    }
}

impl Deref for Version {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}


// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    /// 2 bit code used in format info.
    pub const fn format_bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

// Global constants
//------------------------------------------------------------------------------

pub static VERSION_INFO_BIT_LEN: usize = 18;

pub static VERSION_INFO_POLY: u32 = 0x1F25;

pub static FORMAT_INFO_BIT_LEN: usize = 15;

pub static FORMAT_INFO_POLY: u32 = 0x537;

pub static FORMAT_INFO_MASK: u32 = 0x5412;
