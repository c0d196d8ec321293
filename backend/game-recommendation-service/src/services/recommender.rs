/// Game Recommender
///
/// Serves recommendations from the current artifact bundle generation. A reload swaps the
/// whole bundle under a write lock; requests clone the `Arc` and rank without holding the
/// lock, so an in-flight request always sees exactly one generation.
use crate::config::RecommendConfig;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{ModelInfo, RecommendationRequest, RecommendedGame};
use crate::services::bundle::ArtifactBundle;
use crate::services::store::ArtifactStore;
use content_vector::VectorSpaceError;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info};

pub struct GameRecommender {
    current: RwLock<Arc<ArtifactBundle>>,
    config: RecommendConfig,
}

impl GameRecommender {
    pub fn new(bundle: ArtifactBundle, config: RecommendConfig) -> Self {
        metrics::set_catalog_items(bundle.len());
        Self {
            current: RwLock::new(Arc::new(bundle)),
            config,
        }
    }

    /// Load the initial generation; failure here is fatal for the caller
    pub fn from_store(store: &dyn ArtifactStore, config: RecommendConfig) -> Result<Self> {
        let bundle = store.load()?;
        info!(
            location = %store.location(),
            generation = %bundle.generation(),
            items = bundle.len(),
            "Initial artifact bundle loaded"
        );
        Ok(Self::new(bundle, config))
    }

    /// Snapshot of the serving generation
    pub fn current(&self) -> Arc<ArtifactBundle> {
        Arc::clone(&self.current.read())
    }

    /// Swap in a new generation, returning the previous one
    pub fn install(&self, bundle: ArtifactBundle) -> Arc<ArtifactBundle> {
        let items = bundle.len();
        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(bundle));
        metrics::set_catalog_items(items);
        previous
    }

    /// Load a fresh generation from `store`. On failure the current generation keeps serving.
    pub fn reload(&self, store: &dyn ArtifactStore) -> Result<ModelInfo> {
        match store.load() {
            Ok(bundle) => {
                let info = bundle.model_info();
                let previous = self.install(bundle);
                metrics::record_reload("success");
                info!(
                    location = %store.location(),
                    previous = %previous.generation(),
                    generation = %info.generation,
                    items = info.items,
                    "Artifact bundle reloaded"
                );
                Ok(info)
            }
            Err(e) => {
                metrics::record_reload("error");
                error!(
                    location = %store.location(),
                    error = %e,
                    "Artifact reload failed, keeping current generation"
                );
                Err(e)
            }
        }
    }

    /// Resolve request defaults and rank against the current generation.
    ///
    /// `topK` defaults to `default_top_k` and is capped at `max_top_k`; a non-positive
    /// value is an invalid argument. `alpha` defaults to `default_alpha` and must be finite.
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<RecommendedGame>> {
        let top_k = self.resolve_top_k(request.top_k)?;
        let alpha = request.alpha.unwrap_or(self.config.default_alpha);
        if !alpha.is_finite() {
            return Err(invalid_argument("alpha must be a finite number"));
        }

        self.current()
            .recommend(&request.preference(), top_k, alpha)
    }

    pub fn model_info(&self) -> ModelInfo {
        self.current().model_info()
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    fn resolve_top_k(&self, requested: Option<i64>) -> Result<usize> {
        match requested {
            None => Ok(self.config.default_top_k.min(self.config.max_top_k)),
            Some(k) if k <= 0 => Err(invalid_argument(format!(
                "topK must be a positive integer, got {}",
                k
            ))),
            Some(k) => Ok(usize::try_from(k)
                .unwrap_or(usize::MAX)
                .min(self.config.max_top_k)),
        }
    }
}

fn invalid_argument(message: impl Into<String>) -> AppError {
    VectorSpaceError::InvalidArgumentError(message.into()).into()
}
