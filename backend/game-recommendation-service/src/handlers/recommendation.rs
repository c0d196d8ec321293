/// Recommendation API Handlers
///
/// HTTP endpoints for preference-based game recommendations
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::RecommendationRequest;
use crate::services::{ArtifactStore, GameRecommender};

pub const INTERNAL_API_KEY_HEADER: &str = "x-internal-api-key";

/// Handler state for recommendation service
pub struct RecommendationHandlerState {
    pub recommender: Arc<GameRecommender>,
    pub store: Arc<dyn ArtifactStore>,
    /// Required on the reload endpoint when set
    pub internal_api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub generation: Uuid,
    pub items: usize,
}

/// POST /api/recommend
/// Rank the catalog against a genre/platform preference
#[post("/api/recommend")]
pub async fn recommend(
    body: web::Json<RecommendationRequest>,
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse> {
    let started = Instant::now();
    let request = body.into_inner();
    debug!(
        genre = ?request.genre,
        platform = ?request.platform,
        top_k = ?request.top_k,
        alpha = ?request.alpha,
        "Recommendation request"
    );

    let recommender = Arc::clone(&state.recommender);
    let outcome = web::block(move || recommender.recommend(&request))
        .await
        .map_err(AppError::from)
        .and_then(|result| result);

    match outcome {
        Ok(games) => {
            metrics::record_request("success", started.elapsed());
            Ok(HttpResponse::Ok().json(games))
        }
        Err(err) => {
            metrics::record_request("error", started.elapsed());
            error!("Failed to get recommendations: {}", err);
            Err(err)
        }
    }
}

/// GET /api/recommend/model-info
/// Describe the serving bundle generation
#[get("/api/recommend/model-info")]
pub async fn get_model_info(
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.recommender.model_info()))
}

/// POST /internal/reload
/// Load the latest bundle from the artifact store and swap it in
#[post("/internal/reload")]
pub async fn reload_bundle(
    req: HttpRequest,
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse> {
    if let Some(expected) = state.internal_api_key.as_deref() {
        let provided = req
            .headers()
            .get(INTERNAL_API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected) {
            warn!("Rejected reload request with missing or invalid internal API key");
            return Err(AppError::Authentication(
                "invalid internal API key".to_string(),
            ));
        }
    }

    let recommender = Arc::clone(&state.recommender);
    let store = Arc::clone(&state.store);
    let info = web::block(move || recommender.reload(store.as_ref())).await??;

    Ok(HttpResponse::Ok().json(info))
}

/// GET /health
#[get("/health")]
pub async fn health(state: web::Data<RecommendationHandlerState>) -> HttpResponse {
    let bundle = state.recommender.current();
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        generation: bundle.generation(),
        items: bundle.len(),
    })
}

/// GET /metrics
#[get("/metrics")]
pub async fn metrics_endpoint() -> HttpResponse {
    metrics::serve_metrics().await
}
