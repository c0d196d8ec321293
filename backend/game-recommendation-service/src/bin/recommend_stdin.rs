/// One-shot recommendation over stdin/stdout
///
/// Reads one JSON request (`{"genre", "platform", "topK", "alpha"}`, empty input means `{}`),
/// ranks against the bundle at ARTIFACT_BUNDLE_PATH and prints the result array as JSON.
/// Errors go to stderr with a non-zero exit status.
///
/// Usage:
///   echo '{"genre":"Action","platform":"PC","topK":5}' | cargo run --bin recommend-stdin
use anyhow::{Context, Result};
use game_recommendation_service::config::{ArtifactConfig, RecommendConfig};
use game_recommendation_service::models::RecommendationRequest;
use game_recommendation_service::services::{FileArtifactStore, GameRecommender};
use game_recommendation_service::telemetry::init_tracing;
use std::io::{self, Read, Write};

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let artifacts: ArtifactConfig = envy::prefixed("ARTIFACT_")
        .from_env()
        .context("Failed to load ARTIFACT_ configuration")?;
    let recommend: RecommendConfig = envy::prefixed("RECOMMEND_")
        .from_env()
        .context("Failed to load RECOMMEND_ configuration")?;
    recommend
        .validate()
        .context("Invalid RECOMMEND_ configuration")?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read request from stdin")?;
    let request: RecommendationRequest = if input.trim().is_empty() {
        RecommendationRequest::default()
    } else {
        serde_json::from_str(&input).context("Request must be a JSON object")?
    };

    let store = FileArtifactStore::new(&artifacts.bundle_path);
    let recommender = GameRecommender::from_store(&store, recommend)
        .with_context(|| format!("Failed to load bundle from {}", artifacts.bundle_path))?;
    let games = recommender.recommend(&request)?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &games)?;
    writeln!(stdout)?;

    Ok(())
}
