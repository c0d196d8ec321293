pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::{ArtifactBundle, ArtifactStore, FileArtifactStore, GameRecommender};
