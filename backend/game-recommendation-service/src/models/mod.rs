use serde::{Deserialize, Serialize};

/// Cleaned catalog row produced by ingestion and consumed by training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRow {
    pub name: String,
    pub image: String,
    pub rating: f32,
    pub ratings_count: u64,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub tags: Vec<String>,
    /// Normalized token string (genres, platforms, tags)
    pub features: String,
}

/// Declared user preference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceQuery {
    pub genre: Option<String>,
    pub platform: Option<String>,
}

impl PreferenceQuery {
    /// At most two raw tokens, genre first; blank values are skipped
    pub fn tokens(&self) -> Vec<&str> {
        [self.genre.as_deref(), self.platform.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Request body for POST /api/recommend and the stdin wrapper
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub genre: Option<String>,
    pub platform: Option<String>,
    /// Number of results (default 20)
    #[serde(rename = "topK", alias = "top_k")]
    pub top_k: Option<i64>,
    /// Similarity weight in the blend (default 0.8)
    pub alpha: Option<f32>,
}

impl RecommendationRequest {
    pub fn preference(&self) -> PreferenceQuery {
        PreferenceQuery {
            genre: self.genre.clone(),
            platform: self.platform.clone(),
        }
    }
}

/// One recommended game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedGame {
    pub name: String,
    pub image: String,
    pub rating: f32,
    /// Pipe-joined genre names
    pub genres: String,
    /// Pipe-joined platform names
    pub platforms: String,
    pub score: f32,
}

/// Loaded bundle generation info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub generation: uuid::Uuid,
    pub format_version: u32,
    pub built_at: chrono::DateTime<chrono::Utc>,
    pub items: usize,
    pub vocabulary_size: usize,
    pub max_vocab_size: usize,
}
