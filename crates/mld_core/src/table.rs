//! Maximum-likelihood lookup table.
//!
//! Training collapses an empirical distribution into one predicted logical
//! flip per syndrome by comparing the two logical hypotheses, and accumulates
//! the probability mass the table can never correct. The resulting table is
//! immutable; it is the trained decoder artifact and can be shared across
//! threads and reused for any number of scoring batches.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::MldError;
use crate::bit_utils::BitPack;
use crate::distribution::EmpiricalDistribution;
use crate::outcome::Syndrome;

/// Prediction made for a syndrome whose two logical hypotheses are equally
/// likely.
///
/// Ties favor "no flip". This is asymmetric and raises the reported error
/// floor whenever ties occur, so it is fixed rather than configurable.
pub const TIES_PREDICT_FLIP: bool = false;

/// Trained syndrome-to-flip map.
///
/// Every syndrome of the table's width has exactly one predicted flip, but
/// only syndromes that carried probability mass during training are
/// *observed*; `correction` refuses the others.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    syndrome_bits: usize,
    flips: Vec<u64>,
    observed: Vec<u64>,
    observed_count: usize,
    training_error_rate: f64,
}

impl LookupTable {
    pub fn syndrome_bits(&self) -> usize {
        self.syndrome_bits
    }

    #[inline(always)]
    fn in_range(&self, syndrome: Syndrome) -> bool {
        syndrome.len() == self.syndrome_bits
    }

    /// Raw predicted flip for `syndrome`, observed or not.
    ///
    /// `None` only for a syndrome of a different width.
    pub fn prediction(&self, syndrome: Syndrome) -> Option<bool> {
        self.in_range(syndrome)
            .then(|| BitPack::get(&self.flips, syndrome.index()))
    }

    /// Whether `syndrome` occurred in the training batch.
    pub fn is_observed(&self, syndrome: Syndrome) -> bool {
        self.in_range(syndrome) && BitPack::get(&self.observed, syndrome.index())
    }

    /// Predicted logical flip to apply for `syndrome`.
    ///
    /// Fails with `UnknownSyndrome` if the syndrome never occurred in the
    /// training batch; no default correction is substituted.
    pub fn correction(&self, syndrome: Syndrome) -> Result<bool, MldError> {
        if !self.is_observed(syndrome) {
            return Err(MldError::UnknownSyndrome(syndrome));
        }
        Ok(BitPack::get(&self.flips, syndrome.index()))
    }

    /// Logical error rate the table implies on its own training batch.
    ///
    /// This is the probability mass of the losing hypothesis summed over all
    /// syndromes. It equals the scored error rate only when scoring the
    /// training batch itself.
    pub fn training_error_rate(&self) -> f64 {
        self.training_error_rate
    }

    /// Number of syndromes that occurred in the training batch.
    pub fn observed_syndromes(&self) -> usize {
        self.observed_count
    }

    /// Observed syndromes and their predicted flips, in index order.
    pub fn entries(&self) -> impl Iterator<Item = (Syndrome, bool)> + '_ {
        Syndrome::all(self.syndrome_bits)
            .filter(|&s| self.is_observed(s))
            .map(|s| (s, BitPack::get(&self.flips, s.index())))
    }
}

/// Trains a lookup table by majority vote over the logical axis.
///
/// For each syndrome `s`, predicts a flip when `P(s, 1) > P(s, 0)` and no
/// flip when `P(s, 1) < P(s, 0)`; ties resolve to [`TIES_PREDICT_FLIP`]. The
/// losing hypothesis' probability is added to the training error rate.
///
/// # Returns
///
/// The trained table, or `MissingEntry` if the distribution is not total over
/// its key space.
pub fn train(distribution: &EmpiricalDistribution) -> Result<LookupTable, MldError> {
    let syndrome_bits = distribution.syndrome_bits();
    let num_syndromes = 1usize << syndrome_bits;
    let words = BitPack::words_for(num_syndromes);

    let mut flips = vec![0u64; words];
    let mut observed = vec![0u64; words];
    let mut observed_count = 0;
    let mut training_error_rate = 0.0;

    for syndrome in Syndrome::all(syndrome_bits) {
        let p0 = distribution.probability(syndrome, false)?;
        let p1 = distribution.probability(syndrome, true)?;

        let flip = match p1.partial_cmp(&p0) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Less) => false,
            _ => TIES_PREDICT_FLIP,
        };
        training_error_rate += if flip { p0 } else { p1 };

        BitPack::set(&mut flips, syndrome.index(), flip);
        if p0 + p1 > 0.0 {
            BitPack::set(&mut observed, syndrome.index(), true);
            observed_count += 1;
        }
    }

    Ok(LookupTable {
        syndrome_bits,
        flips,
        observed,
        observed_count,
        training_error_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::build_distribution;
    use crate::outcome::Observation;

    fn obs(syndrome: &str, logical: bool, count: u64) -> Observation {
        Observation::new(syndrome.parse().unwrap(), logical, count)
    }

    fn syn(raw: &str) -> Syndrome {
        raw.parse().unwrap()
    }

    fn reference_table() -> LookupTable {
        let dist = build_distribution(
            [
                obs("00", false, 90),
                obs("00", true, 10),
                obs("01", true, 50),
                obs("01", false, 50),
            ],
            2,
        )
        .unwrap();
        train(&dist).unwrap()
    }

    #[test]
    fn majority_vote_with_tie_favoring_no_flip() {
        let table = reference_table();
        assert_eq!(table.correction(syn("00")), Ok(false));
        assert_eq!(table.correction(syn("01")), Ok(false));
        assert!((table.training_error_rate() - 0.30).abs() < 1e-12);
    }

    #[test]
    fn majority_flip_is_predicted() {
        let dist = build_distribution([obs("1", true, 7), obs("1", false, 3)], 1).unwrap();
        let table = train(&dist).unwrap();
        assert_eq!(table.correction(syn("1")), Ok(true));
        assert!((table.training_error_rate() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn unobserved_syndromes_have_entry_but_no_correction() {
        let table = reference_table();
        assert_eq!(table.observed_syndromes(), 2);
        assert_eq!(table.prediction(syn("11")), Some(false));
        assert!(!table.is_observed(syn("11")));
        assert_eq!(
            table.correction(syn("11")),
            Err(MldError::UnknownSyndrome(syn("11")))
        );
        assert_eq!(table.prediction(syn("000")), None);
    }

    #[test]
    fn entries_list_observed_syndromes_in_order() {
        let table = reference_table();
        let entries: Vec<_> = table.entries().collect();
        assert_eq!(entries, [(syn("00"), false), (syn("01"), false)]);
    }
}
