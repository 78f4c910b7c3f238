//! Address Decomposition.
//!
//! This module splits 32-bit byte addresses into the fields a set-associative
//! cache indexes by. It provides the following:
//! 1. **Field Extraction:** Tag, set index and block offset for a given geometry.
//! 2. **Block Addresses:** The address with the offset stripped, used as the prefetch unit.
//! 3. **Reconstruction:** Rebuilding a block-aligned address from a stored tag and set index.

use super::constants::ADDRESS_BITS;

/// Fields of an address decoded against one cache level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddr {
    /// High-order bits identifying the block within its set.
    pub tag: u32,
    /// Set index.
    pub index: u32,
    /// Byte offset within the block.
    pub offset: u32,
}

/// Splits addresses into `(tag, index, offset)` for a fixed geometry.
///
/// Constructed from bit widths rather than sizes; callers derive the widths
/// from power-of-two block sizes and set counts, which configuration
/// validation guarantees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
}

/// Low `bits` set; saturates at the full word.
#[inline(always)]
const fn mask(bits: u32) -> u32 {
    if bits >= ADDRESS_BITS {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

impl AddressDecoder {
    /// Creates a decoder for the given field widths.
    ///
    /// # Arguments
    ///
    /// * `offset_bits` - `log2(block_size)`.
    /// * `index_bits` - `log2(num_sets)`.
    pub const fn new(offset_bits: u32, index_bits: u32) -> Self {
        Self {
            offset_bits,
            index_bits,
        }
    }

    /// Creates a decoder from a block size and set count (both powers of two).
    pub const fn from_geometry(block_size: u32, num_sets: u32) -> Self {
        Self::new(block_size.trailing_zeros(), num_sets.trailing_zeros())
    }

    /// Number of block-offset bits.
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of set-index bits.
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Number of tag bits: `32 - index_bits - offset_bits`.
    pub const fn tag_bits(&self) -> u32 {
        ADDRESS_BITS - self.index_bits - self.offset_bits
    }

    /// Splits `addr` into its tag, set index and block offset.
    #[inline]
    pub const fn decode(&self, addr: u32) -> DecodedAddr {
        let offset = addr & mask(self.offset_bits);
        let index = (addr >> self.offset_bits) & mask(self.index_bits);
        let tag = match addr.checked_shr(self.offset_bits + self.index_bits) {
            Some(high) => high & mask(self.tag_bits()),
            None => 0,
        };
        DecodedAddr { tag, index, offset }
    }

    /// Returns the block address (`tag || index`), i.e. `addr >> offset_bits`.
    #[inline]
    pub const fn block_address(&self, addr: u32) -> u32 {
        addr >> self.offset_bits
    }

    /// Rebuilds the block-aligned byte address of a line from its tag and set index.
    ///
    /// The offset field of the result is zero.
    #[inline]
    pub const fn compose(&self, tag: u32, index: u32) -> u32 {
        let high = match tag.checked_shl(self.offset_bits + self.index_bits) {
            Some(v) => v,
            None => 0,
        };
        high | (index << self.offset_bits)
    }
}
