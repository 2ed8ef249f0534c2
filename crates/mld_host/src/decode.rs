use anyhow::{Context, Result};
use mld_core::config::DecoderConfig;
use mld_core::decoder::score_tally;
use mld_core::distribution::build_distribution;
use mld_core::table::{LookupTable, train};
use mld_io::loader;
use std::time::Instant;
use tracing::info;

use crate::stats::ScoreSummary;

fn print_table(table: &LookupTable) {
    println!("\nLookup Table ({} observed syndromes)", table.observed_syndromes());
    for (syndrome, flip) in table.entries() {
        println!("  {} -> {}", syndrome, u8::from(flip));
    }
}

/// Trains a lookup table on one file and scores it on another (or the same).
///
/// # Arguments
///
/// * `train_path` - Counts or .b8 file used to train the table
/// * `score_path` - Optional held-out file; defaults to the training file
/// * `config` - Readout layout and target logical value
/// * `show_table` - Print every observed table entry
pub fn run_decode(
    train_path: &str,
    score_path: Option<&str>,
    config: &DecoderConfig,
    show_table: bool,
) -> Result<ScoreSummary> {
    config.validate()?;

    info!(path = train_path, "loading training outcomes");
    let start_load = Instant::now();
    let training = loader::load_records(train_path, config)?;
    info!(
        distinct = training.len(),
        elapsed = ?start_load.elapsed(),
        "training outcomes loaded"
    );

    let distribution = build_distribution(&training, config.syndrome_bits)
        .with_context(|| format!("Failed to build distribution from {}", train_path))?;
    let table = train(&distribution)?;
    info!(
        shots = distribution.total_shots(),
        observed = table.observed_syndromes(),
        "lookup table trained"
    );

    if show_table {
        print_table(&table);
    }

    let tally = match score_path {
        Some(path) => {
            info!(path, "loading held-out outcomes");
            let held_out = loader::load_records(path, config)?;
            score_tally(&held_out, &table, config.correct_value)
                .with_context(|| format!("Failed to score {}", path))?
        }
        None => score_tally(&training, &table, config.correct_value)?,
    };

    let summary = ScoreSummary::new(distribution.total_shots(), &table, tally)
        .context("Scoring batch contains no shots")?;
    summary.print_report();
    Ok(summary)
}
