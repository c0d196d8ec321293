/// Train a new artifact bundle from the cleaned catalog
///
/// Fits the TF-IDF vocabulary over every row's feature string, builds the catalog index
/// and persists all three as one bundle generation. The service picks it up on start or
/// through `POST /internal/reload`.
///
/// Usage:
///   ARTIFACT_BUNDLE_PATH=artifacts/game_bundle.bin cargo run --bin train-model
///
/// Environment variables:
///   - ARTIFACT_CLEAN_GAMES_PATH: cleaned rows (default: data/games_clean.json)
///   - ARTIFACT_BUNDLE_PATH: output bundle, `.json` or `.bin` (default: artifacts/game_bundle.bin)
///   - ARTIFACT_MAX_VOCAB_SIZE: vocabulary cap (default: 5000)
use anyhow::{Context, Result};
use game_recommendation_service::config::ArtifactConfig;
use game_recommendation_service::services::ingest::read_rows;
use game_recommendation_service::services::{ArtifactBundle, ArtifactStore, FileArtifactStore};
use game_recommendation_service::telemetry::init_tracing;
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config: ArtifactConfig = envy::prefixed("ARTIFACT_")
        .from_env()
        .context("Failed to load ARTIFACT_ configuration")?;

    let clean_path = Path::new(&config.clean_games_path);
    let rows = read_rows(clean_path)
        .with_context(|| format!("Failed to read cleaned rows from {}", clean_path.display()))?;
    info!("Training on {} games", rows.len());

    let bundle = ArtifactBundle::train(&rows, config.max_vocab_size)
        .context("Failed to train artifact bundle")?;
    let (n_rows, n_cols) = bundle.matrix().shape();
    info!(
        "Feature matrix: {} rows x {} columns ({} non-zero)",
        n_rows,
        n_cols,
        bundle.matrix().nnz()
    );

    let store = FileArtifactStore::new(&config.bundle_path);
    store
        .save(&bundle)
        .with_context(|| format!("Failed to save bundle to {}", store.location()))?;
    info!(
        "Saved generation {} to {}",
        bundle.generation(),
        store.location()
    );

    Ok(())
}
