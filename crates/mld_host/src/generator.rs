//! Synthetic shot generator for the distance-3 memory experiment.
//!
//! Stands in for a stabilizer circuit simulator: samples one round of
//! stabilizer measurements on the distance-3 surface code prepared in
//! |0...0>, followed by a Z-basis readout of the logical operator's data
//! qubits. Outputs counts files (and optionally .b8 shot files) in the same
//! formats the `decode` command reads.

use anyhow::{Result, ensure};
use mld_common::surface::{NUM_DATA_QUBITS, READOUT_QUBITS, X_CHECK_OFFSET, X_CHECKS, Z_CHECKS};
use mld_core::config::DecoderConfig;
use mld_core::outcome::OutcomeRecord;
use mld_io::loader;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Readout layout of the sampled shots: three readout bits, eight checks.
pub fn surface_layout(correct_value: bool) -> DecoderConfig {
    DecoderConfig {
        distance: READOUT_QUBITS.len(),
        syndrome_bits: X_CHECK_OFFSET + X_CHECKS.len(),
        correct_value,
    }
}

fn support_parity(support: &[usize], errors: &[bool; NUM_DATA_QUBITS]) -> bool {
    support.iter().filter(|&&q| errors[q]).count() % 2 == 1
}

/// Phenomenological depolarizing noise sampler.
///
/// Each data qubit suffers X, Y or Z (uniformly) with probability `p` before
/// the checks; each check outcome is then flipped with probability `p`. The
/// X-type checks of the first round are uniformly random on |0...0>.
pub struct Sampler {
    p: f64,
    rng: StdRng,
}

impl Sampler {
    pub fn new(p: f64, seed: u64) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&p),
            "physical error rate must lie in [0, 1], got {}",
            p
        );
        Ok(Self {
            p,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Samples one shot: readout bits followed by syndrome bits.
    pub fn sample_shot(&mut self) -> Vec<bool> {
        let mut x_errors = [false; NUM_DATA_QUBITS];
        let mut z_errors = [false; NUM_DATA_QUBITS];

        for q in 0..NUM_DATA_QUBITS {
            if self.rng.gen_bool(self.p) {
                match self.rng.gen_range(0..3) {
                    0 => x_errors[q] = true,
                    1 => {
                        x_errors[q] = true;
                        z_errors[q] = true;
                    }
                    _ => z_errors[q] = true,
                }
            }
        }

        let mut shot = Vec::with_capacity(READOUT_QUBITS.len() + Z_CHECKS.len() + X_CHECKS.len());
        shot.extend(READOUT_QUBITS.iter().map(|&q| x_errors[q]));

        for support in Z_CHECKS {
            let flipped = self.rng.gen_bool(self.p);
            shot.push(support_parity(support, &x_errors) ^ flipped);
        }
        for support in X_CHECKS {
            let projected = self.rng.gen_bool(0.5);
            let flipped = self.rng.gen_bool(self.p);
            shot.push(projected ^ support_parity(support, &z_errors) ^ flipped);
        }

        shot
    }

    pub fn sample_shots(&mut self, num_shots: usize) -> Vec<Vec<bool>> {
        (0..num_shots).map(|_| self.sample_shot()).collect()
    }
}

/// Samples `num_shots` shots and aggregates them into outcome records.
pub fn sample_records(p: f64, num_shots: usize, seed: u64) -> Result<Vec<OutcomeRecord>> {
    let shots = Sampler::new(p, seed)?.sample_shots(num_shots);
    loader::records_from_shots(&shots, &surface_layout(false))
}

/// Generates a counts file, and optionally a .b8 shot file, of sampled
/// outcomes.
///
/// # Arguments
///
/// * `counts_path` - Output path for the counts file
/// * `b8_path` - Optional output path for the raw shots
/// * `num_shots` - Number of shots to sample
/// * `p` - Physical error rate
/// * `seed` - RNG seed
pub fn generate_samples(
    counts_path: &str,
    b8_path: Option<&str>,
    num_shots: usize,
    p: f64,
    seed: u64,
) -> Result<()> {
    info!(p, num_shots, seed, "sampling distance-3 memory experiment");
    let shots = Sampler::new(p, seed)?.sample_shots(num_shots);

    let records = loader::records_from_shots(&shots, &surface_layout(false))?;
    loader::write_counts(counts_path, &records)?;
    info!(
        path = counts_path,
        distinct = records.len(),
        "wrote counts file"
    );

    if let Some(path) = b8_path {
        loader::write_b8(path, &shots)?;
        info!(path, "wrote .b8 shot file");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noiseless_shots_read_zero_with_random_x_checks() {
        let mut sampler = Sampler::new(0.0, 7).unwrap();
        for shot in sampler.sample_shots(64) {
            assert_eq!(shot.len(), 11);
            assert!(shot[..3].iter().all(|&b| !b), "readout must be clean");
            assert!(shot[3..7].iter().all(|&b| !b), "Z checks must be quiet");
        }
    }

    #[test]
    fn same_seed_same_shots() {
        let a = Sampler::new(0.05, 11).unwrap().sample_shots(32);
        let b = Sampler::new(0.05, 11).unwrap().sample_shots(32);
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_invalid_rate() {
        assert!(Sampler::new(1.5, 0).is_err());
        assert!(Sampler::new(-0.1, 0).is_err());
    }

    #[test]
    fn sampled_records_count_every_shot() {
        let records = sample_records(0.02, 500, 3).unwrap();
        assert_eq!(records.iter().map(|r| r.count).sum::<u64>(), 500);
        assert!(records.iter().all(|r| r.syndrome.len() == 8));
    }
}
