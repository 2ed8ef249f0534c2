mod decode;
mod generator;
mod stats;
mod sweep;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use mld_common::layout::{DEFAULT_DISTANCE, DEFAULT_SYNDROME_BITS};
use mld_core::config::DecoderConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mld", about = "Lookup-table decoding of distance-3 surface-code memories")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "info", "mld_host=debug")
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LayoutArgs {
    /// Code distance: number of data-readout bits per outcome
    #[arg(long, default_value_t = DEFAULT_DISTANCE)]
    distance: usize,
    /// Number of syndrome bits per outcome
    #[arg(long, default_value_t = DEFAULT_SYNDROME_BITS)]
    syndrome_bits: usize,
    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Args)]
struct TargetArgs {
    /// Logical value a correctly decoded shot must read
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    correct_value: u8,
}

impl LayoutArgs {
    fn to_config(&self) -> DecoderConfig {
        DecoderConfig {
            distance: self.distance,
            syndrome_bits: self.syndrome_bits,
            correct_value: self.target.correct_value == 1,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Sample synthetic outcomes into a counts file
    Gen {
        #[arg(long, default_value = "samples.counts")]
        out: String,
        #[arg(long)]
        b8: Option<String>,
        #[arg(long, default_value_t = 100_000)]
        shots: usize,
        #[arg(long, default_value_t = 0.01)]
        p: f64,
        #[arg(long, default_value_t = 12345)]
        seed: u64,
    },
    /// Train a lookup table and report its logical error rate
    Decode {
        /// Training outcomes (counts file, or .b8 shots)
        #[arg(short, long)]
        train: String,
        /// Held-out outcomes to score; the training file is scored if omitted
        #[arg(short, long)]
        score: Option<String>,
        #[arg(long)]
        show_table: bool,
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Sweep physical error rates, training and scoring a table per rate
    Sweep {
        #[arg(long, value_delimiter = ',', default_values_t = [0.001, 0.002, 0.005, 0.01, 0.02, 0.05])]
        p: Vec<f64>,
        #[arg(long, default_value_t = 2048)]
        shots: usize,
        #[arg(long, default_value_t = 12345)]
        seed: u64,
        /// Score an independently sampled batch instead of the training batch
        #[arg(long)]
        holdout: bool,
        /// Times to double the training batch when a held-out syndrome is unseen
        #[arg(long, default_value_t = 3)]
        max_retrain: u32,
        #[command(flatten)]
        target: TargetArgs,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Gen {
            out,
            b8,
            shots,
            p,
            seed,
        } => {
            generator::generate_samples(&out, b8.as_deref(), shots, p, seed)?;
        }
        Commands::Decode {
            train,
            score,
            show_table,
            layout,
        } => {
            decode::run_decode(&train, score.as_deref(), &layout.to_config(), show_table)?;
        }
        Commands::Sweep {
            p,
            shots,
            seed,
            holdout,
            max_retrain,
            target,
        } => {
            let opts = sweep::SweepOptions {
                shots,
                seed,
                holdout,
                max_retrain,
                correct_value: target.correct_value == 1,
            };
            sweep::run_sweep(&p, &opts)?;
        }
    }
    Ok(())
}
