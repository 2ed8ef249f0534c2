//! Empirical joint distribution over (syndrome, logical value) pairs.
//!
//! Aggregates shot-weighted observations into a dense probability table over
//! the full Cartesian product `{0,1}^S x {0,1}`. Every key is present even if
//! it was never observed, so the training pass can compare both logical
//! hypotheses for every syndrome without special cases.

use alloc::vec;
use alloc::vec::Vec;

use crate::config::validate_syndrome_bits;
use crate::outcome::{Observation, Syndrome};
use crate::{Field, MldError};

/// Slot of a (syndrome, logical value) key in the dense table.
#[inline(always)]
fn slot(syndrome: Syndrome, logical: bool) -> usize {
    (syndrome.index() << 1) | usize::from(logical)
}

/// Normalized joint probability table built from one batch of observations.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalDistribution {
    syndrome_bits: usize,
    total_shots: u64,
    probabilities: Vec<f64>,
}

impl EmpiricalDistribution {
    pub fn syndrome_bits(&self) -> usize {
        self.syndrome_bits
    }

    /// Number of shots the distribution was normalized by.
    pub fn total_shots(&self) -> u64 {
        self.total_shots
    }

    /// Number of keys, always `2^S * 2`.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Probability of observing `syndrome` together with logical value
    /// `logical`.
    ///
    /// Fails with `MissingEntry` only if the key lies outside the table,
    /// which happens when `syndrome` has a different width.
    pub fn probability(&self, syndrome: Syndrome, logical: bool) -> Result<f64, MldError> {
        if syndrome.len() != self.syndrome_bits {
            return Err(MldError::MissingEntry { syndrome, logical });
        }
        self.probabilities
            .get(slot(syndrome, logical))
            .copied()
            .ok_or(MldError::MissingEntry { syndrome, logical })
    }

    /// Iterates every key of the Cartesian product with its probability.
    pub fn iter(&self) -> impl Iterator<Item = (Syndrome, bool, f64)> + '_ {
        self.probabilities.iter().enumerate().map(|(i, &p)| {
            (
                Syndrome::from_bits((i >> 1) as u64, self.syndrome_bits),
                i & 1 == 1,
                p,
            )
        })
    }

    /// Sum over all keys; 1 up to floating-point rounding.
    pub fn total_probability(&self) -> f64 {
        self.probabilities.iter().sum()
    }
}

/// Builds the empirical distribution of a batch.
///
/// Every key of `{0,1}^S x {0,1}` starts at zero, each observation adds its
/// shot count to its key, and the totals are divided by the number of shots
/// in the batch.
///
/// # Arguments
///
/// * `records` - Observations (or outcome records) with their shot counts
/// * `syndrome_bits` - Declared syndrome width `S`
///
/// # Returns
///
/// The normalized distribution, or `LengthMismatch` if any syndrome is not
/// `S` bits wide, `EmptyBatch` if the batch carries zero shots, or
/// `CountOverflow` if the batch carries more than `u64::MAX` shots.
pub fn build_distribution<I, T>(
    records: I,
    syndrome_bits: usize,
) -> Result<EmpiricalDistribution, MldError>
where
    I: IntoIterator<Item = T>,
    T: Into<Observation>,
{
    validate_syndrome_bits(syndrome_bits)?;

    let mut counts = vec![0u64; 2usize << syndrome_bits];
    let mut total_shots = 0u64;

    for observation in records {
        let observation: Observation = observation.into();
        if observation.syndrome.len() != syndrome_bits {
            return Err(MldError::LengthMismatch {
                field: Field::Syndrome,
                expected: syndrome_bits,
                actual: observation.syndrome.len(),
            });
        }
        let key = &mut counts[slot(observation.syndrome, observation.logical)];
        *key = key
            .checked_add(observation.count)
            .ok_or(MldError::CountOverflow)?;
        total_shots = total_shots
            .checked_add(observation.count)
            .ok_or(MldError::CountOverflow)?;
    }

    if total_shots == 0 {
        return Err(MldError::EmptyBatch);
    }

    let n = total_shots as f64;
    let probabilities = counts.into_iter().map(|c| c as f64 / n).collect();

    Ok(EmpiricalDistribution {
        syndrome_bits,
        total_shots,
        probabilities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(syndrome: &str, logical: bool, count: u64) -> Observation {
        Observation::new(syndrome.parse().unwrap(), logical, count)
    }

    #[test]
    fn normalizes_counts_over_all_shots() {
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

        assert_eq!(dist.total_shots(), 200);
        assert_eq!(dist.len(), 8);
        let s00 = "00".parse().unwrap();
        let s01 = "01".parse().unwrap();
        assert_eq!(dist.probability(s00, false), Ok(0.45));
        assert_eq!(dist.probability(s00, true), Ok(0.05));
        assert_eq!(dist.probability(s01, true), Ok(0.25));
        assert_eq!(dist.probability(s01, false), Ok(0.25));
        assert!((dist.total_probability() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unobserved_keys_are_present_with_zero() {
        let dist = build_distribution([obs("00", false, 3)], 2).unwrap();
        for s in Syndrome::all(2) {
            assert!(dist.probability(s, false).is_ok());
            assert!(dist.probability(s, true).is_ok());
        }
        assert_eq!(dist.probability("11".parse().unwrap(), true), Ok(0.0));
        assert_eq!(dist.iter().count(), 8);
    }

    #[test]
    fn repeated_keys_accumulate() {
        let dist = build_distribution([obs("1", true, 1), obs("1", true, 3)], 1).unwrap();
        assert_eq!(dist.probability("1".parse().unwrap(), true), Ok(1.0));
    }

    #[test]
    fn zero_shots_is_empty_batch() {
        assert_eq!(
            build_distribution([obs("00", false, 0)], 2),
            Err(MldError::EmptyBatch)
        );
        assert_eq!(
            build_distribution(Vec::<Observation>::new(), 2),
            Err(MldError::EmptyBatch)
        );
    }

    #[test]
    fn shot_total_overflow_is_rejected() {
        assert_eq!(
            build_distribution([obs("00", false, u64::MAX), obs("01", true, 1)], 2),
            Err(MldError::CountOverflow)
        );
    }

    #[test]
    fn wrong_width_syndrome_is_rejected() {
        assert!(matches!(
            build_distribution([obs("000", false, 1)], 2),
            Err(MldError::LengthMismatch {
                field: Field::Syndrome,
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn foreign_width_lookup_is_missing_entry() {
        let dist = build_distribution([obs("00", false, 1)], 2).unwrap();
        let wide = "000".parse().unwrap();
        assert!(matches!(
            dist.probability(wide, false),
            Err(MldError::MissingEntry { .. })
        ));
    }
}
