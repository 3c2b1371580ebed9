use std::collections::HashMap;
use std::sync::OnceLock;

use super::ec::generator_poly;
use super::metadata::{ECLevel, Version};

// Tables
//------------------------------------------------------------------------------

/// Read-only lookup tables derived from the version range [1, 40].
///
/// Built once and shared by reference across every encode call. All indexing is by
/// version number, so index 0 of each per-version table is unused.
#[derive(Debug, Clone)]
pub struct Tables {
    raw_data_modules: [usize; 41],
    data_codewords: [[usize; 41]; 4],
    alignment_positions: Vec<Vec<i16>>,
    generators: HashMap<usize, Vec<u8>>,
}

static GLOBAL_TABLES: OnceLock<Tables> = OnceLock::new();

impl Tables {
    pub fn new() -> Self {
        let mut raw_data_modules = [0; 41];
        for ver in Version::all() {
            raw_data_modules[*ver as usize] = compute_raw_data_modules(ver);
        }

        let mut data_codewords = [[0; 41]; 4];
        for ecl in ECLevel::ALL {
            for ver in Version::all() {
                let v = *ver as usize;
                let e = ecl.index();
                data_codewords[e][v] =
                    raw_data_modules[v] / 8 - ECC_PER_BLOCK[e][v] * NUM_BLOCKS[e][v];
            }
        }

        let alignment_positions = (0..=40u8)
            .map(|v| match v {
                0 => Vec::new(),
                _ => compute_alignment_positions(Version::new_unchecked(v)),
            })
            .collect();

        let mut generators = HashMap::new();
        for deg in ECC_PER_BLOCK.iter().flat_map(|row| row[1..].iter().copied()) {
            generators.entry(deg).or_insert_with(|| generator_poly(deg));
        }

        Self { raw_data_modules, data_codewords, alignment_positions, generators }
    }

    /// Process-wide instance, initialized on first use.
    pub fn global() -> &'static Tables {
        GLOBAL_TABLES.get_or_init(Tables::new)
    }

    /// Bits available for data and ecc after all function modules are excluded,
    /// including remainder bits.
    pub fn raw_data_modules(&self, ver: Version) -> usize {
        self.raw_data_modules[*ver as usize]
    }

    pub fn total_codewords(&self, ver: Version) -> usize {
        self.raw_data_modules(ver) / 8
    }

    pub fn remainder_bits(&self, ver: Version) -> usize {
        self.raw_data_modules(ver) & 7
    }

    pub fn data_codewords(&self, ver: Version, ecl: ECLevel) -> usize {
        self.data_codewords[ecl.index()][*ver as usize]
    }

    pub fn data_bit_capacity(&self, ver: Version, ecl: ECLevel) -> usize {
        self.data_codewords(ver, ecl) << 3
    }

    pub fn ecc_per_block(&self, ver: Version, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[ecl.index()][*ver as usize]
    }

    pub fn num_blocks(&self, ver: Version, ecl: ECLevel) -> usize {
        NUM_BLOCKS[ecl.index()][*ver as usize]
    }

    pub fn alignment_positions(&self, ver: Version) -> &[i16] {
        &self.alignment_positions[*ver as usize]
    }

    pub fn generator(&self, degree: usize) -> &[u8] {
        match self.generators.get(&degree) {
            Some(gen) => gen,
            None => unreachable!("No generator cached for degree {degree}"),
        }
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

fn compute_raw_data_modules(ver: Version) -> usize {
    let v = *ver as usize;
    let mut res = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        res -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            res -= 36;
        }
    }
    assert!((208..=29648).contains(&res), "Raw data modules miscalculated: Version {v}, {res}");
    res
}

// Ascending positions of alignment pattern centers, used on both axes
fn compute_alignment_positions(ver: Version) -> Vec<i16> {
    let v = *ver as i16;
    if v == 1 {
        return Vec::new();
    }

    let num_align = v / 7 + 2;
    let step = if v == 32 { 26 } else { (v * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2 };
    let mut res = vec![6; num_align as usize];
    let mut pos = ver.width() as i16 - 7;
    for p in res.iter_mut().skip(1).rev() {
        *p = pos;
        pos -= step;
    }
    res
}

#[cfg(test)]
mod tables_tests {
    use test_case::test_case;

    use super::Tables;
    use crate::common::metadata::{ECLevel, Version};

    #[test_case(1, 208)]
    #[test_case(2, 359)]
    #[test_case(3, 567)]
    #[test_case(6, 1383)]
    #[test_case(7, 1568)]
    #[test_case(12, 3728)]
    #[test_case(15, 5243)]
    #[test_case(18, 7211)]
    #[test_case(22, 10068)]
    #[test_case(26, 13652)]
    #[test_case(32, 19723)]
    #[test_case(37, 25568)]
    #[test_case(40, 29648)]
    fn test_raw_data_modules(ver: u8, exp: usize) {
        let tables = Tables::new();
        assert_eq!(tables.raw_data_modules(Version::new(ver).unwrap()), exp);
    }

    #[test_case(3, ECLevel::M, 44)]
    #[test_case(3, ECLevel::Q, 34)]
    #[test_case(3, ECLevel::H, 26)]
    #[test_case(6, ECLevel::L, 136)]
    #[test_case(7, ECLevel::L, 156)]
    #[test_case(9, ECLevel::L, 232)]
    #[test_case(9, ECLevel::M, 182)]
    #[test_case(12, ECLevel::H, 158)]
    #[test_case(15, ECLevel::L, 523)]
    #[test_case(16, ECLevel::Q, 325)]
    #[test_case(19, ECLevel::H, 341)]
    #[test_case(21, ECLevel::L, 932)]
    #[test_case(22, ECLevel::M, 782)]
    #[test_case(24, ECLevel::H, 514)]
    #[test_case(28, ECLevel::L, 1531)]
    #[test_case(33, ECLevel::L, 2071)]
    #[test_case(35, ECLevel::Q, 1286)]
    #[test_case(40, ECLevel::M, 2334)]
    fn test_data_codewords(ver: u8, ecl: ECLevel, exp: usize) {
        let tables = Tables::new();
        assert_eq!(tables.data_codewords(Version::new(ver).unwrap(), ecl), exp);
    }

    #[test]
    fn test_data_codewords_shrink_with_level() {
        let tables = Tables::new();
        for ver in Version::all() {
            let caps = ECLevel::ALL.map(|ecl| tables.data_codewords(ver, ecl));
            assert!(caps.windows(2).all(|w| w[0] > w[1]), "Version {}: {caps:?}", *ver);
        }
    }

    #[test_case(1, &[])]
    #[test_case(2, &[6, 18])]
    #[test_case(3, &[6, 22])]
    #[test_case(6, &[6, 34])]
    #[test_case(7, &[6, 22, 38])]
    #[test_case(8, &[6, 24, 42])]
    #[test_case(16, &[6, 26, 50, 74])]
    #[test_case(25, &[6, 32, 58, 84, 110])]
    #[test_case(32, &[6, 34, 60, 86, 112, 138])]
    #[test_case(33, &[6, 30, 58, 86, 114, 142])]
    #[test_case(39, &[6, 26, 54, 82, 110, 138, 166])]
    #[test_case(40, &[6, 30, 58, 86, 114, 142, 170])]
    fn test_alignment_positions(ver: u8, exp: &[i16]) {
        let tables = Tables::new();
        assert_eq!(tables.alignment_positions(Version::new(ver).unwrap()), exp);
    }

    #[test]
    fn test_generators_cached_for_all_degrees() {
        let tables = Tables::new();
        for ecl in ECLevel::ALL {
            for ver in Version::all() {
                let deg = tables.ecc_per_block(ver, ecl);
                assert_eq!(tables.generator(deg).len(), deg);
            }
        }
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(Tables::global(), Tables::global()));
    }
}

// Global constants
//------------------------------------------------------------------------------

// Index 0 is padding
static ECC_PER_BLOCK: [[usize; 41]; 4] = [
    [0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],
    [0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28],
    [0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],
    [0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],
];

// Index 0 is padding
static NUM_BLOCKS: [[usize; 41]; 4] = [
    [0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25],
    [0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49],
    [0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68],
    [0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81],
];
