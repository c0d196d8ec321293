use actix_web::{web, App, HttpServer};
use std::io;
use std::sync::Arc;

use game_recommendation_service::config::Config;
use game_recommendation_service::handlers::{configure, RecommendationHandlerState};
use game_recommendation_service::services::{ArtifactStore, FileArtifactStore, GameRecommender};
use game_recommendation_service::telemetry::init_tracing;

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        tracing::error!("Configuration loading failed: {}", e);
        io::Error::other(format!("Failed to load configuration: {}", e))
    })?;

    tracing::info!(
        "Starting game-recommendation-service v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Environment: {}", config.app.env);

    // The initial bundle must load; reloads later fall back to the serving generation
    let store: Arc<dyn ArtifactStore> =
        Arc::new(FileArtifactStore::new(&config.artifacts.bundle_path));
    let recommender = match GameRecommender::from_store(store.as_ref(), config.recommend.clone())
    {
        Ok(recommender) => Arc::new(recommender),
        Err(e) => {
            tracing::error!(
                "Failed to load artifact bundle from {}: {}",
                store.location(),
                e
            );
            return Err(io::Error::other(format!(
                "Failed to load artifact bundle: {}",
                e
            )));
        }
    };

    let state = web::Data::new(RecommendationHandlerState {
        recommender,
        store,
        internal_api_key: config.internal_api_key.clone(),
    });

    let bind_addr = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("HTTP server listening on {}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure)
    });
    if let Some(workers) = config.app.workers {
        server = server.workers(workers);
    }

    server.bind(bind_addr)?.run().await
}
