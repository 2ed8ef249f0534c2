//! The decoding seam and the scorer.
//!
//! A trained decoder answers one question: which logical flip to apply for a
//! syndrome. The scorer runs a batch of outcomes through that answer and
//! counts the shots whose corrected logical value misses the target.

use crate::MldError;
use crate::outcome::{Observation, Syndrome};
use crate::table::LookupTable;

/// Maps a syndrome to the logical flip that should be applied to the
/// directly measured logical value.
///
/// The decoder predicts a flip relative to the measured parity rather than an
/// absolute value, so correction composes with either logical target.
pub trait SyndromeDecoder {
    /// Predicted logical flip for `syndrome`.
    ///
    /// # Returns
    ///
    /// `true` to invert the measured logical value, or an error if the
    /// decoder has no prediction for this syndrome.
    fn flip_for(&self, syndrome: Syndrome) -> Result<bool, MldError>;

    /// Corrected logical value of one shot.
    ///
    /// # Arguments
    ///
    /// * `syndrome` - Stabilizer measurement bits of the shot
    /// * `logical` - Parity of the shot's data readout
    fn correct(&self, syndrome: Syndrome, logical: bool) -> Result<bool, MldError> {
        Ok(logical ^ self.flip_for(syndrome)?)
    }
}

impl SyndromeDecoder for LookupTable {
    fn flip_for(&self, syndrome: Syndrome) -> Result<bool, MldError> {
        self.correction(syndrome)
    }
}

/// Shot-weighted count of scored outcomes and of those decoded wrongly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorTally {
    /// Shots scored.
    pub total_count: u64,
    /// Scored shots whose corrected value missed the target.
    pub total_errors: u64,
}

impl ErrorTally {
    /// Adds `count` shots of one outcome, all wrong if `is_error`.
    ///
    /// Fails with `CountOverflow` if either total would exceed `u64::MAX`;
    /// the tally is left unchanged in that case.
    pub fn record(&mut self, count: u64, is_error: bool) -> Result<(), MldError> {
        let total_count = self
            .total_count
            .checked_add(count)
            .ok_or(MldError::CountOverflow)?;
        if is_error {
            self.total_errors = self
                .total_errors
                .checked_add(count)
                .ok_or(MldError::CountOverflow)?;
        }
        self.total_count = total_count;
        Ok(())
    }

    /// Combines tallies of disjoint batches.
    ///
    /// Fails with `CountOverflow` if either sum exceeds `u64::MAX`.
    pub fn merge(self, other: Self) -> Result<Self, MldError> {
        let add = |a: u64, b: u64| a.checked_add(b).ok_or(MldError::CountOverflow);
        Ok(Self {
            total_count: add(self.total_count, other.total_count)?,
            total_errors: add(self.total_errors, other.total_errors)?,
        })
    }

    /// Fraction of shots decoded wrongly.
    ///
    /// Fails with `EmptyBatch` if no shots were tallied.
    pub fn rate(&self) -> Result<f64, MldError> {
        if self.total_count == 0 {
            return Err(MldError::EmptyBatch);
        }
        Ok(self.total_errors as f64 / self.total_count as f64)
    }
}

/// Decodes every outcome of a batch and tallies the mispredictions.
///
/// Each outcome's logical value (the parity of its data readout) is corrected
/// by the decoder's flip for its syndrome and compared against
/// `correct_value`.
///
/// # Arguments
///
/// * `records` - Scoring batch; may be the training batch or a held-out one
/// * `decoder` - Trained decoder, typically a [`LookupTable`]
/// * `correct_value` - Logical value a correctly decoded shot reads
///
/// # Returns
///
/// The tally, or the first decoder error (`UnknownSyndrome` for a syndrome
/// absent from the training batch), or `CountOverflow` if the batch carries
/// more than `u64::MAX` shots. No partial tally is returned.
pub fn score_tally<I, T, D>(
    records: I,
    decoder: &D,
    correct_value: bool,
) -> Result<ErrorTally, MldError>
where
    I: IntoIterator<Item = T>,
    T: Into<Observation>,
    D: SyndromeDecoder + ?Sized,
{
    let mut tally = ErrorTally::default();
    for observation in records {
        let observation: Observation = observation.into();
        let corrected = decoder.correct(observation.syndrome, observation.logical)?;
        tally.record(observation.count, corrected != correct_value)?;
    }
    Ok(tally)
}

/// Logical error rate of a decoder over a batch.
///
/// Fails with `UnknownSyndrome` as [`score_tally`] does, and with
/// `EmptyBatch` if the batch carries zero shots.
pub fn score<I, T, D>(records: I, decoder: &D, correct_value: bool) -> Result<f64, MldError>
where
    I: IntoIterator<Item = T>,
    T: Into<Observation>,
    D: SyndromeDecoder + ?Sized,
{
    score_tally(records, decoder, correct_value)?.rate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::build_distribution;
    use crate::outcome::OutcomeRecord;
    use crate::table::train;

    fn obs(syndrome: &str, logical: bool, count: u64) -> Observation {
        Observation::new(syndrome.parse().unwrap(), logical, count)
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
    fn scores_parity_against_target() {
        let table = reference_table();
        let batch = [
            OutcomeRecord::new("000".parse().unwrap(), "00".parse().unwrap(), 5),
            OutcomeRecord::new("100".parse().unwrap(), "00".parse().unwrap(), 5),
        ];
        assert_eq!(score(&batch, &table, false), Ok(0.5));

        let tally = score_tally(&batch, &table, false).unwrap();
        assert_eq!(
            tally,
            ErrorTally {
                total_count: 10,
                total_errors: 5
            }
        );
    }

    #[test]
    fn flip_is_applied_before_comparison() {
        let dist = build_distribution([obs("1", true, 3), obs("1", false, 1)], 1).unwrap();
        let table = train(&dist).unwrap();
        assert_eq!(score([obs("1", true, 4)], &table, false), Ok(0.0));
        assert_eq!(score([obs("1", true, 4)], &table, true), Ok(1.0));
    }

    #[test]
    fn unknown_syndrome_is_never_defaulted() {
        let table = reference_table();
        let unknown = "11".parse().unwrap();
        assert_eq!(
            score([obs("00", false, 5), obs("11", false, 1)], &table, false),
            Err(MldError::UnknownSyndrome(unknown))
        );
    }

    #[test]
    fn empty_scoring_batch() {
        let table = reference_table();
        assert_eq!(
            score([obs("00", false, 0)], &table, false),
            Err(MldError::EmptyBatch)
        );
        assert_eq!(ErrorTally::default().rate(), Err(MldError::EmptyBatch));
    }

    #[test]
    fn merged_tallies_add() {
        let a = ErrorTally {
            total_count: 10,
            total_errors: 1,
        };
        let b = ErrorTally {
            total_count: 30,
            total_errors: 3,
        };
        assert_eq!(a.merge(b).and_then(|t| t.rate()), Ok(0.1));
    }

    #[test]
    fn tally_overflow_is_an_error() {
        let mut tally = ErrorTally {
            total_count: u64::MAX,
            total_errors: 0,
        };
        assert_eq!(tally.record(1, false), Err(MldError::CountOverflow));
        assert_eq!(tally.total_count, u64::MAX);
        assert_eq!(
            tally.merge(ErrorTally {
                total_count: 1,
                total_errors: 1
            }),
            Err(MldError::CountOverflow)
        );
    }
}
