/// Configuration management
///
/// Every group is read from prefixed environment variables (`APP_PORT`,
/// `ARTIFACT_BUNDLE_PATH`, `RECOMMEND_DEFAULT_TOP_K`, ...) after loading `.env`.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub artifacts: ArtifactConfig,
    pub recommend: RecommendConfig,
    /// Required as `x-internal-api-key` on the reload endpoint when set
    pub internal_api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_env")]
    pub env: String,
    /// Worker threads, actix picks one per core when unset
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    #[serde(default = "default_bundle_path")]
    pub bundle_path: String,
    #[serde(default = "default_raw_games_path")]
    pub raw_games_path: String,
    #[serde(default = "default_clean_games_path")]
    pub clean_games_path: String,
    #[serde(default = "default_max_vocab_size")]
    pub max_vocab_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
    #[serde(default = "default_alpha")]
    pub default_alpha: f32,
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            default_alpha: default_alpha(),
            max_top_k: default_max_top_k(),
        }
    }
}

impl RecommendConfig {
    /// Both limits must allow at least one result
    pub fn validate(&self) -> Result<(), envy::Error> {
        if self.default_top_k < 1 {
            return Err(envy::Error::Custom(
                "RECOMMEND_DEFAULT_TOP_K must be at least 1".to_string(),
            ));
        }
        if self.max_top_k < 1 {
            return Err(envy::Error::Custom(
                "RECOMMEND_MAX_TOP_K must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenv::dotenv().ok();

        let recommend: RecommendConfig = envy::prefixed("RECOMMEND_").from_env()?;
        recommend.validate()?;

        Ok(Config {
            app: envy::prefixed("APP_").from_env()?,
            artifacts: envy::prefixed("ARTIFACT_").from_env()?,
            recommend,
            internal_api_key: std::env::var("INTERNAL_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
        })
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_env() -> String {
    "development".to_string()
}

fn default_bundle_path() -> String {
    "artifacts/game_bundle.bin".to_string()
}

fn default_raw_games_path() -> String {
    "data/allGames.json".to_string()
}

fn default_clean_games_path() -> String {
    "data/games_clean.json".to_string()
}

fn default_max_vocab_size() -> usize {
    5000
}

fn default_top_k() -> usize {
    20
}

fn default_alpha() -> f32 {
    content_vector::DEFAULT_ALPHA
}

fn default_max_top_k() -> usize {
    100
}
