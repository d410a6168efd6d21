//! Anemia risk service binary.

use anemia_core::Model;
use anemia_server::{start_server, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "anemia-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Web service for the anemia risk predictor", long_about = None)]
struct Args {
    /// Path to the trained model artifact
    #[arg(short, long, default_value = "models/anemia/model.json")]
    model: PathBuf,

    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:10000")]
    listen: String,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let model = Model::load_json(&args.model)
        .with_context(|| format!("failed to load model from {}", args.model.display()))?;
    let state = AppState::new(model)?;
    info!(
        "Loaded model {} ({} trees)",
        state.model_hash,
        state.model.num_trees()
    );

    start_server(state, &args.listen).await
}
