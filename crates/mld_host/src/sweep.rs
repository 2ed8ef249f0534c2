use anyhow::Result;
use mld_core::MldError;
use mld_core::decoder::score_tally;
use mld_core::distribution::build_distribution;
use mld_core::table::train;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::generator::{sample_records, surface_layout};
use crate::stats::{SWEEP_HEADER, ScoreSummary, SweepPoint};

// Keeps held-out streams disjoint from every training stream of the same point.
const HOLDOUT_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub shots: usize,
    pub seed: u64,
    pub holdout: bool,
    pub max_retrain: u32,
    pub correct_value: bool,
}

fn point_seed(base: u64, idx: usize) -> u64 {
    base.wrapping_add((idx as u64).wrapping_mul(0x1000_0000))
}

/// Trains and scores a lookup table at one physical error rate.
///
/// When scoring a held-out batch, an unseen syndrome doubles the training
/// batch and retrains, up to `max_retrain` times.
pub fn sweep_point(p: f64, opts: &SweepOptions, seed: u64) -> Result<SweepPoint> {
    let config = surface_layout(opts.correct_value);
    let held_out = if opts.holdout {
        Some(sample_records(p, opts.shots, seed ^ HOLDOUT_SEED_SALT)?)
    } else {
        None
    };

    let mut train_shots = opts.shots;
    let mut attempt = 0;
    loop {
        let training = sample_records(p, train_shots, seed.wrapping_add(u64::from(attempt)))?;
        let distribution = build_distribution(&training, config.syndrome_bits)?;
        let table = train(&distribution)?;
        debug!(
            p,
            train_shots,
            observed = table.observed_syndromes(),
            training_ler = table.training_error_rate(),
            "trained lookup table"
        );

        let batch = held_out.as_deref().unwrap_or(&training[..]);
        match score_tally(batch, &table, config.correct_value) {
            Ok(tally) => {
                let summary = ScoreSummary::new(distribution.total_shots(), &table, tally)?;
                return Ok(SweepPoint {
                    physical_error_rate: p,
                    summary,
                });
            }
            Err(MldError::UnknownSyndrome(syndrome)) if attempt < opts.max_retrain => {
                warn!(
                    p,
                    %syndrome,
                    train_shots,
                    "held-out syndrome never seen in training, doubling training shots"
                );
                train_shots *= 2;
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Sweeps physical error rates in parallel and prints one CSV row per rate.
pub fn run_sweep(rates: &[f64], opts: &SweepOptions) -> Result<()> {
    info!(
        points = rates.len(),
        shots = opts.shots,
        holdout = opts.holdout,
        "starting sweep (parallel - rayon)"
    );
    let start = Instant::now();

    let mut points = rates
        .par_iter()
        .enumerate()
        .map(|(idx, &p)| sweep_point(p, opts, point_seed(opts.seed, idx)))
        .collect::<Result<Vec<_>>>()?;
    points.sort_by(|a, b| a.physical_error_rate.total_cmp(&b.physical_error_rate));

    info!(elapsed = ?start.elapsed(), "sweep finished");

    println!("{}", SWEEP_HEADER);
    for point in &points {
        println!("{}", point.to_row());
    }

    Ok(())
}
