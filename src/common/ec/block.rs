use std::ops::Deref;

use super::galois::ecc;
use crate::common::metadata::{ECLevel, Version};
use crate::common::tables::Tables;

// Block
//------------------------------------------------------------------------------

/// Data codewords of one block followed by its Reed-Solomon remainder.
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct Block {
    data: Vec<u8>,
    ecc: Vec<u8>,
}

impl Block {
    pub fn new(data: &[u8], generator: &[u8]) -> Self {
        Self { data: data.to_vec(), ecc: ecc(data, generator) }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.data.len() + self.ecc.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn ecc(&self) -> &[u8] {
        &self.ecc
    }
}

// Splits data codewords into short blocks followed by long blocks, and computes ecc
// for each
pub(crate) fn blockify(data: &[u8], ver: Version, ecl: ECLevel, tables: &Tables) -> Vec<Block> {
    assert_eq!(
        data.len(),
        tables.data_codewords(ver, ecl),
        "Data length doesn't match data codeword capacity: Version {}, Ec level {ecl:?}",
        *ver
    );

    let num_blocks = tables.num_blocks(ver, ecl);
    let ecc_len = tables.ecc_per_block(ver, ecl);
    let raw_codewords = tables.total_codewords(ver);
    let num_short_blocks = num_blocks - raw_codewords % num_blocks;
    let short_block_len = raw_codewords / num_blocks;
    let generator = tables.generator(ecc_len);

    let mut blocks = Vec::with_capacity(num_blocks);
    let mut start = 0;
    for i in 0..num_blocks {
        let dlen = short_block_len - ecc_len + usize::from(i >= num_short_blocks);
        blocks.push(Block::new(&data[start..start + dlen], generator));
        start += dlen;
    }
    assert_eq!(start, data.len(), "Blocks don't cover all data codewords");
    blocks
}

pub(crate) fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}

/// Full codeword sequence: interleaved data codewords followed by interleaved ecc.
pub(crate) fn add_ecc_and_interleave(
    data: &[u8],
    ver: Version,
    ecl: ECLevel,
    tables: &Tables,
) -> Vec<u8> {
    let blocks = blockify(data, ver, ecl, tables);
    let data_blocks = blocks.iter().map(Block::data).collect::<Vec<_>>();
    let ecc_blocks = blocks.iter().map(Block::ecc).collect::<Vec<_>>();

    let mut res = interleave(&data_blocks);
    res.extend(interleave(&ecc_blocks));
    assert_eq!(
        res.len(),
        tables.total_codewords(ver),
        "Codeword count mismatch: Version {}, Ec level {ecl:?}",
        *ver
    );
    res
}
