pub use planner::*;
pub use writer::*;

// Capacity planner
//------------------------------------------------------------------------------

pub mod planner {
    use tracing::trace;

    use crate::common::codec::Segment;
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};
    use crate::common::tables::Tables;

    /// Bits needed to encode `segs` at `ver`: mode indicator, character count field
    /// and payload of each segment. `None` if a character count doesn't fit its
    /// field or the total overflows an i32.
    pub fn total_bits(segs: &[Segment], ver: Version) -> Option<usize> {
        let mut res: usize = 0;
        for seg in segs {
            let cc_bits = seg.mode.char_cnt_bits(ver);
            if seg.char_cnt >= 1 << cc_bits {
                return None;
            }
            res = add_bits(res, 4 + cc_bits + seg.bit_len())?;
        }
        Some(res)
    }

    // Running bit total, bounded by i32::MAX
    fn add_bits(total: usize, bits: usize) -> Option<usize> {
        total.checked_add(bits).filter(|&t| t <= i32::MAX as usize)
    }

    /// Smallest version in `min..=max` that fits `segs` at `ecl`, with the bits used.
    pub fn find_min_version(
        segs: &[Segment],
        ecl: ECLevel,
        min: Version,
        max: Version,
        tables: &Tables,
    ) -> QRResult<(Version, usize)> {
        debug_assert!(min <= max, "Invalid version range: {} > {}", *min, *max);

        let mut last = None;
        for v in *min..=*max {
            let ver = Version::new_unchecked(v);
            let bcap = tables.data_bit_capacity(ver, ecl);
            let used = total_bits(segs, ver);
            trace!(version = v, capacity = bcap, used = ?used, "Checking version");
            match used {
                Some(sz) if sz <= bcap => return Ok((ver, sz)),
                _ => last = Some((used, bcap)),
            }
        }

        match last {
            Some((Some(required), capacity)) => Err(QRError::CapacityOverflow { required, capacity }),
            _ => Err(QRError::DataTooLong),
        }
    }

    /// Highest level above `ecl` whose capacity at `ver` still holds `used_bits`.
    pub fn boost_ec_level(used_bits: usize, ver: Version, ecl: ECLevel, tables: &Tables) -> ECLevel {
        ECLevel::ALL
            .into_iter()
            .filter(|&e| e > ecl)
            .fold(ecl, |best, e| if used_bits <= tables.data_bit_capacity(ver, e) { e } else { best })
    }

    #[cfg(test)]
    mod planner_tests {
        use test_case::test_case;

        use super::{add_bits, boost_ec_level, find_min_version, total_bits};
        use crate::common::codec::{make_segments, Mode, Segment};
        use crate::common::error::QRError;
        use crate::common::metadata::{ECLevel, Version};
        use crate::common::tables::Tables;

        fn ver(v: u8) -> Version {
            Version::new(v).unwrap()
        }

        #[test]
        fn test_total_bits_empty() {
            for v in Version::all() {
                assert_eq!(total_bits(&[], v), Some(0));
            }
        }

        #[test]
        fn test_total_bits_byte() {
            let segs = [Segment::dummy(Mode::Byte, 3, 24)];
            assert_eq!(total_bits(&segs, ver(2)), Some(36));
            assert_eq!(total_bits(&segs, ver(10)), Some(44));
            assert_eq!(total_bits(&segs, ver(30)), Some(44));
        }

        #[test]
        fn test_total_bits_mixed() {
            let segs = [
                Segment::dummy(Mode::Eci, 0, 8),
                Segment::dummy(Mode::Numeric, 7, 24),
                Segment::dummy(Mode::Alphanumeric, 1, 6),
                Segment::dummy(Mode::Kanji, 4, 52),
            ];
            assert_eq!(total_bits(&segs, ver(9)), Some(133));
            assert_eq!(total_bits(&segs, ver(21)), Some(139));
            assert_eq!(total_bits(&segs, ver(27)), Some(145));
        }

        #[test]
        fn test_total_bits_count_overflow() {
            let segs = [Segment::dummy(Mode::Byte, 4093, 32744)];
            assert_eq!(total_bits(&segs, ver(1)), None);
            assert_eq!(total_bits(&segs, ver(10)), Some(32764));
            assert_eq!(total_bits(&segs, ver(27)), Some(32764));
        }

        #[test]
        fn test_total_bits_many_segments() {
            let mut segs = vec![Segment::dummy(Mode::Numeric, 2047, 6824); 4];
            segs.push(Segment::dummy(Mode::Numeric, 1617, 5390));
            assert_eq!(total_bits(&segs, ver(1)), None);
            assert_eq!(total_bits(&segs, ver(10)), Some(32766));
            assert_eq!(total_bits(&segs, ver(27)), Some(32776));

            let mut segs = vec![Segment::dummy(Mode::Kanji, 255, 3315); 9];
            segs.push(Segment::dummy(Mode::Alphanumeric, 511, 2811));
            assert_eq!(total_bits(&segs, ver(9)), Some(32767));
            assert_eq!(total_bits(&segs, ver(26)), Some(32787));
            assert_eq!(total_bits(&segs, ver(40)), Some(32807));
        }

        #[test]
        fn test_add_bits_bounded() {
            let max = i32::MAX as usize;
            assert_eq!(add_bits(0, 0), Some(0));
            assert_eq!(add_bits(32764, 20), Some(32784));
            assert_eq!(add_bits(max - 10, 10), Some(max));
            assert_eq!(add_bits(max - 10, 11), None);
            assert_eq!(add_bits(max, 1), None);
            assert_eq!(add_bits(usize::MAX, 1), None);
        }

        #[test_case("aaaaa11111AAA", ECLevel::L, 1)]
        #[test_case("A11111111111111".repeat(2), ECLevel::L, 2)]
        #[test_case("1".repeat(41), ECLevel::L, 1)]
        #[test_case("1".repeat(42), ECLevel::L, 2)]
        #[test_case("a".repeat(2953), ECLevel::L, 40)]
        #[test_case("a".repeat(1273), ECLevel::H, 40)]
        fn test_find_min_version(data: impl AsRef<str>, ecl: ECLevel, exp_ver: u8) {
            let tables = Tables::new();
            let segs = make_segments(data.as_ref());
            let (v, used) = find_min_version(&segs, ecl, Version::MIN, Version::MAX, &tables).unwrap();
            assert_eq!(v, ver(exp_ver));
            assert!(used <= tables.data_bit_capacity(v, ecl));
        }

        #[test]
        fn test_find_min_version_respects_min() {
            let tables = Tables::new();
            let segs = make_segments("HELLO");
            let (v, _) = find_min_version(&segs, ECLevel::L, ver(5), Version::MAX, &tables).unwrap();
            assert_eq!(v, ver(5));
        }

        #[test]
        fn test_find_min_version_capacity_overflow() {
            let tables = Tables::new();
            let segs = make_segments(&"a".repeat(2954));
            let res = find_min_version(&segs, ECLevel::L, Version::MIN, Version::MAX, &tables);
            assert_eq!(res, Err(QRError::CapacityOverflow { required: 23652, capacity: 23648 }));

            let segs = make_segments(&"a".repeat(100));
            let res = find_min_version(&segs, ECLevel::L, Version::MIN, ver(3), &tables);
            assert_eq!(res, Err(QRError::CapacityOverflow { required: 812, capacity: 440 }));
        }

        #[test]
        fn test_find_min_version_too_long() {
            let tables = Tables::new();
            let segs = [Segment::dummy(Mode::Byte, 70000, 0)];
            let res = find_min_version(&segs, ECLevel::L, Version::MIN, Version::MAX, &tables);
            assert_eq!(res, Err(QRError::DataTooLong));
        }

        #[test]
        fn test_boost_ec_level() {
            let tables = Tables::new();
            // Version 1 capacities: L 152, M 128, Q 104, H 72
            let v1 = ver(1);
            assert_eq!(boost_ec_level(60, v1, ECLevel::L, &tables), ECLevel::H);
            assert_eq!(boost_ec_level(100, v1, ECLevel::L, &tables), ECLevel::Q);
            assert_eq!(boost_ec_level(120, v1, ECLevel::L, &tables), ECLevel::M);
            assert_eq!(boost_ec_level(150, v1, ECLevel::L, &tables), ECLevel::L);
            assert_eq!(boost_ec_level(60, v1, ECLevel::H, &tables), ECLevel::H);
            assert_eq!(boost_ec_level(100, v1, ECLevel::Q, &tables), ECLevel::Q);
        }
    }
}

// Writer for encoded data
//------------------------------------------------------------------------------

pub mod writer {
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Segment, PADDING_CODEWORDS};
    use crate::common::metadata::{ECLevel, Version};
    use crate::common::tables::Tables;

    /// Data codewords for `segs` at `ver` and `ecl`: segment headers and payloads,
    /// terminator, bit padding and pad codewords, packed msb first.
    pub fn encode_data(
        segs: &[Segment],
        ver: Version,
        ecl: ECLevel,
        used_bits: usize,
        tables: &Tables,
    ) -> Vec<u8> {
        let bcap = tables.data_bit_capacity(ver, ecl);
        let mut bs = BitStream::new(bcap);
        for seg in segs {
            push_segment(seg, ver, &mut bs);
        }
        assert_eq!(bs.len(), used_bits, "Incorrect data size calculation");

        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        assert_eq!(bs.len(), bcap, "Data not padded to capacity");
        bs.into_data()
    }

    pub fn push_segment(seg: &Segment, ver: Version, out: &mut BitStream) {
        push_header(seg, ver, out);
        out.append(&seg.data);
    }

    fn push_header(seg: &Segment, ver: Version, out: &mut BitStream) {
        out.push_bits(seg.mode.indicator(), 4);
        let len_bits = seg.mode.char_cnt_bits(ver);
        let char_cnt = seg.char_cnt;
        assert!(
            char_cnt < (1 << len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
        );
        out.push_bits(char_cnt as u32, len_bits);
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            let padding_bits_len = 8 - offset;
            out.push_bits(0u8, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        assert!(offset == 0, "Bit offset should be zero before padding codewords: {}", offset);

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}
