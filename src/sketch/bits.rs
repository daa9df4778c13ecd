//! Fixed-width sign-bit sketches.

use bit_vec::BitVec;

/// A `projection_bits`-wide fingerprint of a vector.
///
/// Bits are packed into `u32` blocks; unused trailing bits of the last block
/// are always zero, so Hamming distance is a popcount over XOR-ed blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sketch {
    bits: BitVec,
}

impl Sketch {
    /// Build a sketch from per-direction projections: bit `j` is set iff
    /// `projections[j]` is strictly positive.
    pub fn from_projections<I>(width: usize, projections: I) -> Self
    where
        I: IntoIterator<Item = f32>,
    {
        let mut bits = BitVec::from_elem(width, false);
        for (j, value) in projections.into_iter().take(width).enumerate() {
            if value > 0.0 {
                bits.set(j, true);
            }
        }
        Self { bits }
    }

    /// Sketch width in bits.
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Whether bit `j` is set.
    pub fn get(&self, j: usize) -> bool {
        self.bits.get(j).unwrap_or(false)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.bits.storage().iter().map(|block| block.count_ones()).sum()
    }

    /// Number of differing bit positions. Both sketches must share a width.
    pub fn hamming_distance(&self, other: &Sketch) -> u32 {
        debug_assert_eq!(self.width(), other.width());
        self.bits
            .storage()
            .iter()
            .zip(other.bits.storage())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}
