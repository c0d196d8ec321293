//! Game recommendation services
//!
//! Offline path: `ingest` (raw records → rows) → `bundle::ArtifactBundle::train` → `store`.
//! Online path: `store` → `recommender::GameRecommender` → ranked games.

pub mod bundle;
pub mod catalog;
pub mod ingest;
pub mod recommender;
pub mod store;

pub use bundle::{ArtifactBundle, BUNDLE_FORMAT_VERSION};
pub use catalog::{CatalogEntry, CatalogIndex};
pub use ingest::{flatten_record, prepare_rows};
pub use recommender::GameRecommender;
pub use store::{ArtifactFormat, ArtifactStore, FileArtifactStore};
