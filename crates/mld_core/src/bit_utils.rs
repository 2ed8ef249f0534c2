//! Word-level bit packing.
//!
//! Fields of an outcome string and the lookup table's per-syndrome flags are
//! all stored as little-endian bits in `u64` words: bit `i` lives in word
//! `i / 64` at position `i % 64`.

use crate::{Field, MldError};

/// Number of bits held by one storage word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// Namespace for packed-bit helpers.
pub struct BitPack;

impl BitPack {
    /// Reads bit `index` of a packed bitset.
    ///
    /// # Arguments
    ///
    /// * `storage` - Words holding the bitset
    /// * `index` - Bit position; must lie within `storage`
    #[inline(always)]
    pub fn get(storage: &[u64], index: usize) -> bool {
        let word = storage[index / WORD_BITS];
        let bit = index % WORD_BITS;
        (word >> bit) & 1 == 1
    }

    /// Writes bit `index` of a packed bitset.
    #[inline(always)]
    pub fn set(storage: &mut [u64], index: usize, val: bool) {
        let word_idx = index / WORD_BITS;
        let bit_idx = index % WORD_BITS;
        if val {
            storage[word_idx] |= 1 << bit_idx;
        } else {
            storage[word_idx] &= !(1 << bit_idx);
        }
    }

    /// Words needed to hold `bits` bits.
    #[inline(always)]
    pub fn words_for(bits: usize) -> usize {
        bits.div_ceil(WORD_BITS)
    }

    /// Packs a `0`/`1` string into one word, character `i` landing in bit `i`.
    ///
    /// The caller is responsible for checking the string against its declared
    /// width; this only rejects non-binary characters and strings that do not
    /// fit in a word.
    pub fn pack_str(raw: &str, field: Field) -> Result<u64, MldError> {
        let mut word = 0u64;
        for (i, c) in raw.chars().enumerate() {
            if i >= WORD_BITS {
                return Err(MldError::UnsupportedWidth {
                    field,
                    width: raw.chars().count(),
                });
            }
            match c {
                '0' => {}
                '1' => word |= 1 << i,
                found => return Err(MldError::InvalidBit { field, found }),
            }
        }
        Ok(word)
    }

    /// Packs a slice of booleans into one word, element `i` landing in bit `i`.
    pub fn pack_bools(bits: &[bool]) -> u64 {
        bits.iter()
            .take(WORD_BITS)
            .enumerate()
            .fold(0u64, |word, (i, &b)| word | (u64::from(b) << i))
    }

    /// Parity of the set bits in a word.
    #[inline(always)]
    pub fn parity(word: u64) -> bool {
        word.count_ones() % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_str_is_lsb_first() {
        assert_eq!(BitPack::pack_str("100", Field::Syndrome), Ok(0b001));
        assert_eq!(BitPack::pack_str("011", Field::Syndrome), Ok(0b110));
        assert_eq!(BitPack::pack_str("", Field::Syndrome), Ok(0));
    }

    #[test]
    fn pack_str_rejects_non_binary() {
        assert_eq!(
            BitPack::pack_str("01x", Field::DataReadout),
            Err(MldError::InvalidBit {
                field: Field::DataReadout,
                found: 'x'
            })
        );
    }

    #[test]
    fn pack_bools_matches_pack_str() {
        let bools = [true, false, true, true];
        assert_eq!(
            Ok(BitPack::pack_bools(&bools)),
            BitPack::pack_str("1011", Field::Syndrome)
        );
    }

    #[test]
    fn set_and_get_across_words() {
        let mut storage = [0u64; 2];
        BitPack::set(&mut storage, 3, true);
        BitPack::set(&mut storage, 70, true);
        assert!(BitPack::get(&storage, 3));
        assert!(BitPack::get(&storage, 70));
        assert!(!BitPack::get(&storage, 69));
        BitPack::set(&mut storage, 70, false);
        assert!(!BitPack::get(&storage, 70));
        assert_eq!(BitPack::words_for(65), 2);
    }

    #[test]
    fn parity_counts_ones() {
        assert!(!BitPack::parity(0));
        assert!(BitPack::parity(0b100));
        assert!(!BitPack::parity(0b101));
    }
}
