//! End-to-end and property tests for training and scoring lookup tables.

use mld_core::decoder::{score, score_tally};
use mld_core::distribution::build_distribution;
use mld_core::outcome::{Observation, OutcomeRecord, Syndrome};
use mld_core::table::{TIES_PREDICT_FLIP, train};
use mld_core::{Field, MldError};
use proptest::prelude::*;

fn obs(syndrome: &str, logical: bool, count: u64) -> Observation {
    Observation::new(syndrome.parse().unwrap(), logical, count)
}

fn training_batch() -> Vec<Observation> {
    vec![
        obs("00", false, 90),
        obs("00", true, 10),
        obs("01", true, 50),
        obs("01", false, 50),
    ]
}

#[test]
fn reference_table_and_training_error() {
    let dist = build_distribution(training_batch(), 2).unwrap();
    let table = train(&dist).unwrap();

    assert_eq!(table.correction("00".parse().unwrap()), Ok(false));
    assert_eq!(table.correction("01".parse().unwrap()), Ok(false));
    assert!((table.training_error_rate() - 0.30).abs() < 1e-12);
}

#[test]
fn held_out_batch_scores_against_readout_parity() {
    let dist = build_distribution(training_batch(), 2).unwrap();
    let table = train(&dist).unwrap();

    let scoring = [
        OutcomeRecord::new("000".parse().unwrap(), "00".parse().unwrap(), 5),
        OutcomeRecord::new("001".parse().unwrap(), "00".parse().unwrap(), 5),
    ];
    assert_eq!(score(&scoring, &table, false), Ok(0.5));
}

#[test]
fn scoring_unseen_syndrome_fails() {
    let dist = build_distribution(training_batch(), 2).unwrap();
    let table = train(&dist).unwrap();

    let result = score([obs("10", false, 3)], &table, false);
    assert_eq!(
        result,
        Err(MldError::UnknownSyndrome("10".parse().unwrap()))
    );
}

#[test]
fn zero_shot_batches_are_rejected_everywhere() {
    let empty = [obs("00", false, 0), obs("01", true, 0)];
    assert_eq!(build_distribution(empty, 2), Err(MldError::EmptyBatch));

    let dist = build_distribution(training_batch(), 2).unwrap();
    let table = train(&dist).unwrap();
    assert_eq!(score(empty, &table, false), Err(MldError::EmptyBatch));
}

#[test]
fn mixed_width_batch_is_rejected_whole() {
    let batch = [obs("00", false, 10), obs("000", true, 1)];
    assert_eq!(
        build_distribution(batch, 2),
        Err(MldError::LengthMismatch {
            field: Field::Syndrome,
            expected: 2,
            actual: 3
        })
    );
}

#[test]
fn ties_resolve_to_configured_policy() {
    assert!(!TIES_PREDICT_FLIP);
    let dist = build_distribution([obs("1", false, 4), obs("1", true, 4)], 1).unwrap();
    let table = train(&dist).unwrap();
    assert_eq!(table.correction("1".parse().unwrap()), Ok(TIES_PREDICT_FLIP));
}

/// A non-empty batch of observations over syndromes of 1 to 6 bits, every
/// observation carrying at least one shot.
fn batch_strategy() -> impl Strategy<Value = (usize, Vec<Observation>)> {
    (1usize..=6).prop_flat_map(|bits| {
        let observation = (0u64..(1u64 << bits), any::<bool>(), 1u64..500).prop_map(
            move |(syndrome, logical, count)| {
                Observation::new(Syndrome::from_bits(syndrome, bits), logical, count)
            },
        );
        (Just(bits), prop::collection::vec(observation, 1..40))
    })
}

proptest! {
    /// Probabilities over all `2^S * 2` keys sum to one.
    #[test]
    fn prop_distribution_is_normalized((bits, batch) in batch_strategy()) {
        let dist = build_distribution(&batch, bits).unwrap();
        prop_assert_eq!(dist.len(), 2usize << bits);
        prop_assert!((dist.total_probability() - 1.0).abs() < 1e-9);
    }

    /// Every syndrome of the table's width has exactly one prediction.
    #[test]
    fn prop_table_is_total((bits, batch) in batch_strategy()) {
        let table = train(&build_distribution(&batch, bits).unwrap()).unwrap();
        for s in Syndrome::all(bits) {
            prop_assert!(table.prediction(s).is_some());
        }
    }

    /// Equal evidence for both hypotheses never predicts a flip.
    #[test]
    fn prop_ties_favor_no_flip(
        (bits, mut batch) in batch_strategy(),
        tie_count in 1u64..500,
    ) {
        let tied = Syndrome::from_bits(0, bits);
        batch.retain(|o| o.syndrome != tied);
        batch.push(Observation::new(tied, false, tie_count));
        batch.push(Observation::new(tied, true, tie_count));

        let table = train(&build_distribution(&batch, bits).unwrap()).unwrap();
        prop_assert_eq!(table.prediction(tied), Some(false));
        prop_assert_eq!(table.correction(tied), Ok(false));
    }

    /// Training is a pure function of the distribution.
    #[test]
    fn prop_training_is_idempotent((bits, batch) in batch_strategy()) {
        let dist = build_distribution(&batch, bits).unwrap();
        prop_assert_eq!(train(&dist).unwrap(), train(&dist).unwrap());
    }

    /// Scoring the training batch reproduces the training error rate.
    #[test]
    fn prop_scoring_training_batch_matches_diagnostic((bits, batch) in batch_strategy()) {
        let table = train(&build_distribution(&batch, bits).unwrap()).unwrap();
        let scored = score(&batch, &table, false).unwrap();
        prop_assert!((scored - table.training_error_rate()).abs() < 1e-9);

        let tally = score_tally(&batch, &table, false).unwrap();
        prop_assert_eq!(tally.total_count, batch.iter().map(|o| o.count).sum::<u64>());
    }
}
