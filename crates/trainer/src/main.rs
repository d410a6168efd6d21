//! Anemia risk trainer CLI.
//!
//! `synth` writes the synthetic dataset, `train` fits a model on a CSV and
//! persists the canonical JSON artifact plus its blake3 hash.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use anemia_core::format_micro_2dp;
use anemia_trainer::{synth, train_from_csv, TrainParams};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "anemia-train")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deterministic dataset synthesizer and GBDT trainer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the synthetic labelled dataset
    Synth {
        /// Output CSV path
        #[arg(short, long, default_value = "data/anemia.csv")]
        output: PathBuf,

        /// Number of records to draw
        #[arg(long, default_value = "5000")]
        records: usize,

        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: i64,
    },

    /// Fit a model on a CSV dataset and persist the artifact
    Train {
        /// Input CSV dataset path
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for model.json and model.hash
        #[arg(short, long, default_value = "models/anemia")]
        output: PathBuf,

        /// Number of boosting trees
        #[arg(long, default_value = "64")]
        trees: usize,

        /// Maximum tree depth
        #[arg(long, default_value = "6")]
        max_depth: usize,

        /// Minimum samples per leaf
        #[arg(long, default_value = "32")]
        min_samples_leaf: usize,

        /// Learning rate, micro-scaled (100000 = 0.1)
        #[arg(long, default_value = "100000")]
        learning_rate: i64,

        /// Quantization step for candidate thresholds
        #[arg(long, default_value = "1000000")]
        quant_step: i64,

        /// Shuffle seed for the train/test split
        #[arg(long, default_value = "42")]
        seed: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    match cli.command {
        Command::Synth {
            output,
            records,
            seed,
        } => run_synth(output, records, seed),
        Command::Train {
            input,
            output,
            trees,
            max_depth,
            min_samples_leaf,
            learning_rate,
            quant_step,
            seed,
        } => {
            let params = TrainParams {
                num_trees: trees,
                max_depth,
                min_samples_leaf,
                learning_rate,
                quant_step,
            };
            run_train(input, output, params, seed)
        }
    }
}

fn run_synth(output: PathBuf, records: usize, seed: i64) -> Result<()> {
    info!("Synthesizing {} records (seed {})", records, seed);

    let rows = synth::synthesize(&synth::SynthConfig { records, seed });
    let at_risk = rows.iter().filter(|(_, label)| *label == 1).count();

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).context("failed to create output directory")?;
    }
    synth::write_csv(&output, &rows)?;

    info!(
        "Wrote {} ({} at-risk / {} not-at-risk)",
        output.display(),
        at_risk,
        rows.len() - at_risk
    );
    Ok(())
}

fn run_train(input: PathBuf, output: PathBuf, params: TrainParams, seed: i64) -> Result<()> {
    info!("Loading dataset from {}", input.display());
    info!(
        "Training configuration: trees={} max_depth={} min_samples_leaf={} learning_rate={} quant_step={}",
        params.num_trees,
        params.max_depth,
        params.min_samples_leaf,
        params.learning_rate,
        params.quant_step
    );

    let (model, accuracy) = train_from_csv(&input, params, seed)?;

    info!("Held-out accuracy: {}", format_micro_2dp(accuracy));
    info!("Bias: {}", model.bias);
    info!("Trees: {}", model.num_trees());

    std::fs::create_dir_all(&output).context("failed to create output directory")?;

    let model_path = output.join("model.json");
    let canonical_json = model
        .to_canonical_json()
        .context("failed to serialize model")?;
    std::fs::write(&model_path, &canonical_json).context("failed to write model file")?;

    let hash_hex = hex::encode(blake3::hash(canonical_json.as_bytes()).as_bytes());
    let hash_path = output.join("model.hash");
    std::fs::write(&hash_path, &hash_hex).context("failed to write hash file")?;

    info!("Model: {}", model_path.display());
    info!("Hash:  {} ({})", hash_path.display(), hash_hex);
    Ok(())
}
