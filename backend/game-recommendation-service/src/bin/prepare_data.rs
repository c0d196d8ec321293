/// Flatten raw game records into the cleaned catalog used for training
///
/// Reads a JSON array of RAWG-style records, drops records without a name and duplicate
/// names (first record wins), and writes the cleaned rows.
///
/// Usage:
///   ARTIFACT_RAW_GAMES_PATH=data/allGames.json cargo run --bin prepare-data
///
/// Environment variables:
///   - ARTIFACT_RAW_GAMES_PATH: raw records (default: data/allGames.json)
///   - ARTIFACT_CLEAN_GAMES_PATH: cleaned rows output (default: data/games_clean.json)
use anyhow::{Context, Result};
use game_recommendation_service::config::ArtifactConfig;
use game_recommendation_service::services::ingest::{prepare_rows, read_raw_records, write_rows};
use game_recommendation_service::telemetry::init_tracing;
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config: ArtifactConfig = envy::prefixed("ARTIFACT_")
        .from_env()
        .context("Failed to load ARTIFACT_ configuration")?;

    let raw_path = Path::new(&config.raw_games_path);
    let clean_path = Path::new(&config.clean_games_path);

    let records = read_raw_records(raw_path)
        .with_context(|| format!("Failed to read raw games from {}", raw_path.display()))?;
    info!("Read {} raw records from {}", records.len(), raw_path.display());

    let rows = prepare_rows(&records);

    write_rows(clean_path, &rows)
        .with_context(|| format!("Failed to write cleaned rows to {}", clean_path.display()))?;
    info!("Wrote {} games to {}", rows.len(), clean_path.display());

    Ok(())
}
