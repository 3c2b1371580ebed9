use std::fmt::Display;
use std::mem;

use num_traits::{PrimInt, Unsigned};

// Bit stream
//------------------------------------------------------------------------------

/// Bits packed most-significant-bit first into bytes, with a fixed maximum bit
/// capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
    // Max bit capacity
    capacity: usize,
    // Pointer to take bits
    cursor: usize,
}

impl BitStream {
    pub fn new(capacity: usize) -> Self {
        Self { data: Vec::with_capacity((capacity + 7) >> 3), len: 0, capacity, cursor: 0 }
    }

    pub fn from(inp: &[u8]) -> Self {
        let bit_len = inp.len() << 3;
        Self { data: inp.to_vec(), len: bit_len, capacity: bit_len, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn get(&self, pos: usize) -> bool {
        debug_assert!(pos < self.len, "Out of bitstream bounds: Len {}, Pos {}", self.len, pos);

        (self.data[pos >> 3] >> (7 - (pos & 7))) & 1 == 1
    }

    /// Bits in order as individual values.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.get(i))
    }
}

// Push bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Unsigned + Display,
    {
        let max_bits = mem::size_of::<T>() * 8;
        assert!(size <= 31, "Bit length out of range: {size}");
        assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );
        assert!(
            self.len + size <= self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + size
        );

        let bits = bits.to_u32().expect("Bits fit in 31 bits after the length check");
        let mut remaining = size;
        while remaining > 0 {
            let offset = self.len & 7;
            if offset == 0 {
                self.data.push(0);
            }
            let take = remaining.min(8 - offset);
            let chunk = ((bits >> (remaining - take)) & ((1 << take) - 1)) as u8;
            let pos = self.len >> 3;
            self.data[pos] |= chunk << (8 - offset - take);
            self.len += take;
            remaining -= take;
        }
    }

    pub fn push(&mut self, bit: bool) {
        assert!(
            self.len < self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + 1
        );

        let offset = self.len & 7;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            let pos = self.len >> 3;
            self.data[pos] |= 0b10000000 >> offset;
        }

        self.len += 1;
    }

    /// Appends every bit of `other`, preserving order.
    pub fn append(&mut self, other: &BitStream) {
        if self.len & 7 == 0 {
            assert!(
                self.len + other.len <= self.capacity,
                "Insufficient capacity: Capacity {}, Size {}",
                self.capacity,
                self.len + other.len
            );
            self.data.extend_from_slice(&other.data);
            self.len += other.len;
        } else {
            other.bits().for_each(|b| self.push(b));
        }
    }
}


// Read bits in order
//------------------------------------------------------------------------------

impl BitStream {
    pub fn take(&mut self) -> Option<bool> {
        if self.cursor == self.len {
            return None;
        }

        let bit = self.get(self.cursor);
        self.cursor += 1;
        Some(bit)
    }
}

// Iterator for bit stream
//------------------------------------------------------------------------------

impl Iterator for BitStream {
    type Item = bool;
    fn next(&mut self) -> Option<Self::Item> {
        self.take()
    }
}

#[cfg(test)]
mod bit_stream_iter_tests {
    use super::BitStream;

    #[test]
    fn test_iter_msb_first() {
        let bits = BitStream::from(&[0b1010_0001, 0b1000_0000]).collect::<Vec<_>>();
        assert_eq!(bits.len(), 16);
        assert_eq!(bits[..8], [true, false, true, false, false, false, false, true]);
        assert!(bits[8]);
        assert!(bits[9..].iter().all(|&b| !b));
    }

    #[test]
    fn test_iter_empty() {
        let mut bs = BitStream::from(&[]);
        assert_eq!(bs.next(), None);
    }
}
