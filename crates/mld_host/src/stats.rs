//! Logical error rate statistics for reporting.
//!
//! Summarizes a trained table and a scoring tally into the figures printed
//! by the `decode` and `sweep` commands, including a Wilson score interval
//! on the scored logical error rate.

use mld_core::MldError;
use mld_core::decoder::ErrorTally;
use mld_core::table::LookupTable;

/// z-score for a 95% confidence interval.
pub const Z_95: f64 = 1.96;

/// Header line matching [`SweepPoint::to_row`].
pub const SWEEP_HEADER: &str =
    "physical_p,train_shots,score_shots,logical_errors,training_ler,ler,ler_ci_low,ler_ci_high";

/// Figures describing one trained table scored on one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    /// Shots in the training batch.
    pub train_shots: u64,
    /// Syndromes that occurred in the training batch.
    pub observed_syndromes: usize,
    /// Error rate the table implies on its own training batch.
    pub training_error_rate: f64,
    /// Shots in the scoring batch.
    pub score_shots: u64,
    /// Scoring shots decoded to the wrong logical value.
    pub logical_errors: u64,
    /// `logical_errors / score_shots`.
    pub logical_error_rate: f64,
    /// 95% confidence interval lower bound.
    pub ci_low: f64,
    /// 95% confidence interval upper bound.
    pub ci_high: f64,
}

impl ScoreSummary {
    /// Fails with `EmptyBatch` if the tally holds no shots.
    pub fn new(train_shots: u64, table: &LookupTable, tally: ErrorTally) -> Result<Self, MldError> {
        let logical_error_rate = tally.rate()?;
        let (ci_low, ci_high) = wilson_interval(&tally, Z_95).ok_or(MldError::EmptyBatch)?;
        Ok(Self {
            train_shots,
            observed_syndromes: table.observed_syndromes(),
            training_error_rate: table.training_error_rate(),
            score_shots: tally.total_count,
            logical_errors: tally.total_errors,
            logical_error_rate,
            ci_low,
            ci_high,
        })
    }

    /// Prints a formatted report of the summary.
    pub fn print_report(&self) {
        println!("\nLogical Error Rate (Lookup Table)");
        println!("Training shots:      {}", self.train_shots);
        println!("Observed syndromes:  {}", self.observed_syndromes);
        println!("Training LER:        {:.6}", self.training_error_rate);
        println!("Scoring shots:       {}", self.score_shots);
        println!("Logical errors:      {}", self.logical_errors);
        println!(
            "Logical error rate:  {:.6}  (95% CI {:.6} - {:.6})",
            self.logical_error_rate, self.ci_low, self.ci_high
        );
    }
}

/// One point of a physical-error-rate sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub physical_error_rate: f64,
    pub summary: ScoreSummary,
}

impl SweepPoint {
    /// Format as CSV row.
    pub fn to_row(&self) -> String {
        let s = &self.summary;
        format!(
            "{:.6},{},{},{},{:.6e},{:.6e},{:.6e},{:.6e}",
            self.physical_error_rate,
            s.train_shots,
            s.score_shots,
            s.logical_errors,
            s.training_error_rate,
            s.logical_error_rate,
            s.ci_low,
            s.ci_high,
        )
    }
}

/// Wilson score interval on the logical error rate of a tally.
///
/// # Arguments
///
/// * `tally` - Scored shots and logical errors
/// * `z` - Two-sided z-score of the confidence level, e.g. [`Z_95`]
///
/// # Returns
///
/// `(lower, upper)` clamped to `[0, 1]`, or `None` for an empty tally.
pub fn wilson_interval(tally: &ErrorTally, z: f64) -> Option<(f64, f64)> {
    let rate = tally.rate().ok()?;
    let n = tally.total_count as f64;
    let z2_n = z * z / n;

    let scale = 1.0 + z2_n;
    let center = rate + z2_n / 2.0;
    let half_width = z * (rate * (1.0 - rate) / n + z2_n / (4.0 * n)).sqrt();

    Some((
        ((center - half_width) / scale).max(0.0),
        ((center + half_width) / scale).min(1.0),
    ))
}
