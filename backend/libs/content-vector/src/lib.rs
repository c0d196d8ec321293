//! Content vector space for catalog recommendations
//!
//! Builds a sparse TF-IDF space over item metadata and ranks items against a short
//! preference query by blending cosine similarity with normalized popularity.
//!
//! # Workflow
//! 1. `tokenizer` normalizes genre/platform/tag names into a feature string per item
//! 2. `vocabulary::fit` learns the vocabulary + IDF weights and emits the row matrix (offline)
//! 3. `encoder::encode` maps preference tokens into the same space (online)
//! 4. `ranker::rank` scores every row and selects a stable top-K

pub mod encoder;
pub mod error;
pub mod ranker;
pub mod sparse;
pub mod tokenizer;
pub mod vocabulary;

pub use encoder::encode;
pub use error::{Result, VectorSpaceError};
pub use ranker::{normalize_popularity, rank, ScoredRow, DEFAULT_ALPHA};
pub use sparse::{FeatureMatrix, SparseVector};
pub use tokenizer::{feature_string, feature_tokens, normalize_token};
pub use vocabulary::{fit, VocabularyModel};
