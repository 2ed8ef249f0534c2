//! Outcome records and the packed bit strings they carry.
//!
//! A sampled shot is reduced to two fixed-width bit strings: the data-qubit
//! readout that determines the logical value, and the stabilizer syndrome.
//! Both are packed least-significant-bit first, so character `i` of the raw
//! string is bit `i` of the word and a syndrome's packed value doubles as its
//! index into dense per-syndrome tables.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt::{self, Write};
use core::str::FromStr;

use mld_common::layout::MAX_SYNDROME_BITS;

use crate::bit_utils::{BitPack, WORD_BITS};
use crate::MldError;

#[inline(always)]
fn mask(len: usize) -> u64 {
    if len >= WORD_BITS {
        u64::MAX
    } else {
        (1u64 << len) - 1
    }
}

fn write_bits(f: &mut fmt::Formatter<'_>, bits: u64, len: usize) -> fmt::Result {
    for i in 0..len {
        f.write_char(if (bits >> i) & 1 == 1 { '1' } else { '0' })?;
    }
    Ok(())
}

/// Stabilizer measurement bits of one shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Syndrome {
    bits: u64,
    len: u8,
}

impl Syndrome {
    /// Builds a syndrome of `len` bits from a packed word.
    ///
    /// Bits at or above `len` are discarded.
    pub fn from_bits(bits: u64, len: usize) -> Self {
        let len = len.min(WORD_BITS);
        Self {
            bits: bits & mask(len),
            len: len as u8,
        }
    }

    /// Builds a syndrome from one boolean per check, element `i` becoming
    /// bit `i`.
    pub fn from_bools(bits: &[bool]) -> Self {
        Self::from_bits(BitPack::pack_bools(bits), bits.len())
    }

    /// Packed check outcomes, check `i` in bit `i`.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of checks, the syndrome width `S`.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of this syndrome among all syndromes of its width.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.bits as usize
    }

    /// Outcome of check `i`; `false` past the syndrome's width.
    pub fn bit(&self, i: usize) -> bool {
        i < self.len() && (self.bits >> i) & 1 == 1
    }

    /// Every syndrome of `len` bits, in index order.
    ///
    /// `len` must be a validated syndrome width (at most
    /// [`MAX_SYNDROME_BITS`]); the enumeration is `2^len` long.
    pub fn all(len: usize) -> impl Iterator<Item = Syndrome> {
        debug_assert!(len <= MAX_SYNDROME_BITS, "syndrome width {} unsupported", len);
        (0..1u64 << len).map(move |bits| Syndrome::from_bits(bits, len))
    }
}

impl fmt::Display for Syndrome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bits(f, self.bits, self.len())
    }
}

impl FromStr for Syndrome {
    type Err = MldError;

    /// Parses a syndrome whose width is the length of the string itself.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::readout::parse_syndrome(s, s.chars().count())
    }
}

/// Data-qubit readout bits of one shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataReadout {
    bits: u64,
    len: u8,
}

impl DataReadout {
    /// Builds a readout of `len` bits from a packed word, discarding bits at
    /// or above `len`.
    pub fn from_bits(bits: u64, len: usize) -> Self {
        let len = len.min(WORD_BITS);
        Self {
            bits: bits & mask(len),
            len: len as u8,
        }
    }

    /// Builds a readout from one boolean per data qubit.
    pub fn from_bools(bits: &[bool]) -> Self {
        Self::from_bits(BitPack::pack_bools(bits), bits.len())
    }

    /// Packed readout, qubit `i` in bit `i`.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of data qubits read out, the code distance `d`.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Logical value read directly off the data qubits: the parity of the
    /// readout bits.
    pub fn parity(&self) -> bool {
        BitPack::parity(self.bits)
    }
}

impl fmt::Display for DataReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bits(f, self.bits, self.len())
    }
}

impl FromStr for DataReadout {
    type Err = MldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::readout::parse_data_readout(s, s.chars().count())
    }
}

/// One distinct sampled outcome and the number of shots that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub data_readout: DataReadout,
    pub syndrome: Syndrome,
    /// Shots that produced this outcome; zero is allowed and contributes
    /// nothing.
    pub count: u64,
}

impl OutcomeRecord {
    pub fn new(data_readout: DataReadout, syndrome: Syndrome, count: u64) -> Self {
        Self {
            data_readout,
            syndrome,
            count,
        }
    }

    /// Uncorrected logical value of this outcome.
    pub fn logical(&self) -> bool {
        self.data_readout.parity()
    }
}

/// A (syndrome, logical value, count) triple, the unit both the distribution
/// builder and the scorer consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub syndrome: Syndrome,
    pub logical: bool,
    pub count: u64,
}

impl Observation {
    pub fn new(syndrome: Syndrome, logical: bool, count: u64) -> Self {
        Self {
            syndrome,
            logical,
            count,
        }
    }
}

impl From<OutcomeRecord> for Observation {
    fn from(record: OutcomeRecord) -> Self {
        Self::new(record.syndrome, record.logical(), record.count)
    }
}

impl From<&OutcomeRecord> for Observation {
    fn from(record: &OutcomeRecord) -> Self {
        Self::from(*record)
    }
}

impl From<&Observation> for Observation {
    fn from(observation: &Observation) -> Self {
        *observation
    }
}

/// Folds records with the same (data readout, syndrome) pair into one,
/// summing their counts and keeping first-seen order.
///
/// # Returns
///
/// The merged records, or `CountOverflow` if a summed count exceeds
/// `u64::MAX`.
pub fn merge_duplicates<I>(records: I) -> Result<Vec<OutcomeRecord>, MldError>
where
    I: IntoIterator<Item = OutcomeRecord>,
{
    let mut merged: Vec<OutcomeRecord> = Vec::new();
    let mut slots: BTreeMap<(DataReadout, Syndrome), usize> = BTreeMap::new();

    for record in records {
        match slots.get(&(record.data_readout, record.syndrome)) {
            Some(&idx) => {
                merged[idx].count = merged[idx]
                    .count
                    .checked_add(record.count)
                    .ok_or(MldError::CountOverflow)?;
            }
            None => {
                slots.insert((record.data_readout, record.syndrome), merged.len());
                merged.push(record);
            }
        }
    }
    Ok(merged)
}
