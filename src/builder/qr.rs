use std::ops::Deref;

use tracing::trace;

use crate::common::bit_utils::BitStream;
use crate::common::iter::EncRegionIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::*;
use crate::common::tables::Tables;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Module {
    /// Modules of finder, timing, alignment, format and version patterns. Never
    /// masked or overwritten by data.
    pub fn is_function(self) -> bool {
        matches!(self, Module::Func(_) | Module::Version(_) | Module::Format(_))
    }
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

/// Symbol under construction, with every module tagged by the pattern it belongs to.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        assert!(-w <= r && r < w, "Row out of bounds: {r}");
        assert!(-w <= c && c < w, "Column out of bounds: {c}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r as usize) * self.w + c as usize
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }
}

#[cfg(test)]
mod qr_util_tests {
    use super::{Module, QR};
    use crate::common::metadata::{Color, ECLevel, Version};

    fn qr_v1() -> QR {
        QR::new(Version::new(1).unwrap(), ECLevel::L)
    }

    #[test]
    fn test_index_wrap() {
        let mut qr = qr_v1();
        let w = qr.w as i16;
        qr.set(-1, -1, Module::Func(Color::Dark));
        assert_eq!(qr.get(w - 1, w - 1), Module::Func(Color::Dark));
        qr.set(0, 0, Module::Func(Color::Dark));
        assert_eq!(qr.get(-w, -w), Module::Func(Color::Dark));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let qr = qr_v1();
        let w = qr.w as i16;
        qr.get(w, 0);
    }

    #[test]
    #[should_panic]
    fn test_col_out_of_bound() {
        let qr = qr_v1();
        let w = qr.w as i16;
        qr.get(0, w);
    }

    #[test]
    #[should_panic]
    fn test_row_index_overwrap() {
        let qr = qr_v1();
        let w = qr.w as i16;
        qr.get(-(w + 1), 0);
    }

    #[test]
    fn test_is_function() {
        assert!(Module::Func(Color::Dark).is_function());
        assert!(Module::Format(Color::Light).is_function());
        assert!(Module::Version(Color::Dark).is_function());
        assert!(!Module::Data(Color::Dark).is_function());
        assert!(!Module::Empty.is_function());
    }
}

// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // 7x7 pattern centered at (r, c) with its light separator on the inner sides
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Func(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        self.draw_line(6, 8, 6, w - 9);
        self.draw_line(8, 6, w - 9, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Func(Color::from(j & 1 == 0)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Func(Color::from(i & 1 == 0)));
            }
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self, tables: &Tables) {
        let poses = tables.alignment_positions(self.ver);
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                        _ => Module::Func(Color::Light),
                    },
                )
            }
        }
    }
}

// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_all_function_patterns(&mut self, tables: &Tables) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns(tables);
    }
}


// Format & version info
//------------------------------------------------------------------------------

/// 5 data bits of level and mask, a 10 bit BCH remainder, xored with the fixed mask.
pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u32 {
    let data = ecl.format_bits() << 3 | *mask as u32;
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_INFO_POLY);
    }
    let info = (data << 10 | rem) ^ FORMAT_INFO_MASK;
    assert!(info >> FORMAT_INFO_BIT_LEN == 0, "Format info overflow: {info:#x}");
    info
}

impl QR {
    pub(crate) fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        self.draw_number(
            format_info,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_QR_MAIN,
        );
        self.draw_number(
            format_info,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_QR_SIDE,
        );
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    pub(crate) fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let ver_info = self.ver.info();
        self.draw_number(
            ver_info,
            Module::Version(Color::Light),
            Module::Version(Color::Dark),
            &VERSION_INFO_COORDS_BL,
        );
        self.draw_number(
            ver_info,
            Module::Version(Color::Light),
            Module::Version(Color::Dark),
            &VERSION_INFO_COORDS_TR,
        );
    }

    // Bit i of number goes to coords[i]
    fn draw_number(&mut self, number: u32, off_clr: Module, on_clr: Module, coords: &[(i16, i16)]) {
        for (i, &(r, c)) in coords.iter().enumerate() {
            if (number >> i) & 1 == 0 {
                self.set(r, c, off_clr);
            } else {
                self.set(r, c, on_clr);
            }
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    /// Places codewords msb first along the zig-zag path, skipping function modules.
    /// Modules left over once the codewords run out are remainder bits and stay light.
    pub fn draw_codewords(&mut self, codewords: &[u8]) {
        let payload = BitStream::from(codewords);
        let bit_len = payload.len();
        let mut coords = EncRegionIter::new(self.ver);
        let mut placed = 0;
        for bit in payload {
            for (r, c) in coords.by_ref() {
                if matches!(self.get(r, c), Module::Empty) {
                    self.set(r, c, Module::Data(Color::from(bit)));
                    placed += 1;
                    break;
                }
            }
        }
        assert_eq!(placed, bit_len, "Codewords exceed encoding region: Version {}", *self.ver);

        let rem = self.fill_remainder_bits(coords);
        trace!(bits = placed, remainder = rem, "Placed codewords");
        assert!(!self.grid.contains(&Module::Empty), "Empty module left after placing codewords");
    }

    fn fill_remainder_bits(&mut self, coords: impl Iterator<Item = (i16, i16)>) -> usize {
        let mut n = 0;
        for (r, c) in coords {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Data(Color::Light));
                n += 1;
            }
        }
        n
    }

    /// Xors data modules selected by `pattern`. Applying twice restores the grid.
    pub fn toggle_mask(&mut self, pattern: MaskPattern) {
        let mask_fn = pattern.mask_function();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_fn(r, c) {
                    if let Module::Data(clr) = self.get(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
    }

    /// Toggles data modules for `pattern` and draws the matching format info.
    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        self.toggle_mask(pattern);
        let info = format_info(self.ecl, pattern);
        self.draw_format_info(info);
    }
}


// Finished symbol
//------------------------------------------------------------------------------

/// An encoded QR symbol. Row major grid of dark and light modules with (0, 0) at
/// the top left.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct QRCode {
    modules: Vec<Color>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: MaskPattern,
}

impl QRCode {
    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> MaskPattern {
        self.mask
    }

    /// # Panics
    ///
    /// Panics if `r` or `c` is not below the width.
    pub fn get(&self, r: usize, c: usize) -> Color {
        assert!(r < self.w && c < self.w, "Module out of bounds: ({r}, {c})");
        self.modules[r * self.w + c]
    }

    pub fn is_dark(&self, r: usize, c: usize) -> bool {
        self.get(r, c) == Color::Dark
    }

    pub fn modules(&self) -> &[Color] {
        &self.modules
    }
}

impl From<QR> for QRCode {
    /// # Panics
    ///
    /// Panics if the grid still has empty modules or no mask was applied.
    fn from(qr: QR) -> Self {
        let mask = match qr.mask {
            Some(m) => m,
            None => panic!("Symbol finalized without a mask"),
        };
        assert!(!qr.grid.contains(&Module::Empty), "Symbol finalized with empty modules");

        let modules = qr.grid.iter().map(|m| **m).collect();
        Self { modules, w: qr.w, ver: qr.ver, ecl: qr.ecl, mask }
    }
}


// Global constants
//------------------------------------------------------------------------------

// Least significant bit first
static FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (0, 8),
    (1, 8),
    (2, 8),
    (3, 8),
    (4, 8),
    (5, 8),
    (7, 8),
    (8, 8),
    (8, 7),
    (8, 5),
    (8, 4),
    (8, 3),
    (8, 2),
    (8, 1),
    (8, 0),
];

static FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (8, -1),
    (8, -2),
    (8, -3),
    (8, -4),
    (8, -5),
    (8, -6),
    (8, -7),
    (8, -8),
    (-7, 8),
    (-6, 8),
    (-5, 8),
    (-4, 8),
    (-3, 8),
    (-2, 8),
    (-1, 8),
];

static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-11, 0),
    (-10, 0),
    (-9, 0),
    (-11, 1),
    (-10, 1),
    (-9, 1),
    (-11, 2),
    (-10, 2),
    (-9, 2),
    (-11, 3),
    (-10, 3),
    (-9, 3),
    (-11, 4),
    (-10, 4),
    (-9, 4),
    (-11, 5),
    (-10, 5),
    (-9, 5),
];

static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (0, -11),
    (0, -10),
    (0, -9),
    (1, -11),
    (1, -10),
    (1, -9),
    (2, -11),
    (2, -10),
    (2, -9),
    (3, -11),
    (3, -10),
    (3, -9),
    (4, -11),
    (4, -10),
    (4, -9),
    (5, -11),
    (5, -10),
    (5, -9),
];
