/// Artifact Bundle
///
/// One trained generation: vocabulary model, feature matrix and catalog index, written
/// together by the trainer and loaded together by the service. A bundle is validated when
/// it is assembled or deserialized, so a loaded bundle always has one catalog entry per
/// matrix row.
use crate::error::{AppError, Result};
use crate::models::{GameRow, ModelInfo, PreferenceQuery, RecommendedGame};
use crate::services::catalog::CatalogIndex;
use chrono::{DateTime, Utc};
use content_vector::{encode, fit, rank, FeatureMatrix, VectorSpaceError, VocabularyModel};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info};
use uuid::Uuid;

/// Bumped whenever the persisted layout changes
pub const BUNDLE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "StoredBundle")]
pub struct ArtifactBundle {
    format_version: u32,
    generation: Uuid,
    built_at: DateTime<Utc>,
    max_vocab_size: usize,
    model: VocabularyModel,
    matrix: FeatureMatrix,
    index: CatalogIndex,
    /// Ratings in row order, derived from `index`
    ratings: Vec<f32>,
}

/// Persisted layout (field order matters for bincode)
#[derive(Deserialize)]
struct StoredBundle {
    format_version: u32,
    generation: Uuid,
    built_at: DateTime<Utc>,
    max_vocab_size: usize,
    model: VocabularyModel,
    matrix: FeatureMatrix,
    index: CatalogIndex,
}

#[derive(Serialize)]
struct StoredBundleRef<'a> {
    format_version: u32,
    generation: &'a Uuid,
    built_at: &'a DateTime<Utc>,
    max_vocab_size: usize,
    model: &'a VocabularyModel,
    matrix: &'a FeatureMatrix,
    index: &'a CatalogIndex,
}

impl Serialize for ArtifactBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        StoredBundleRef {
            format_version: self.format_version,
            generation: &self.generation,
            built_at: &self.built_at,
            max_vocab_size: self.max_vocab_size,
            model: &self.model,
            matrix: &self.matrix,
            index: &self.index,
        }
        .serialize(serializer)
    }
}

impl TryFrom<StoredBundle> for ArtifactBundle {
    type Error = AppError;

    fn try_from(stored: StoredBundle) -> Result<Self> {
        if stored.format_version != BUNDLE_FORMAT_VERSION {
            return Err(AppError::CorruptArtifact(format!(
                "unsupported bundle format version {} (expected {})",
                stored.format_version, BUNDLE_FORMAT_VERSION
            )));
        }

        Self::assemble(
            stored.generation,
            stored.built_at,
            stored.max_vocab_size,
            stored.model,
            stored.matrix,
            stored.index,
        )
    }
}

impl ArtifactBundle {
    /// Build a fresh generation from already trained parts
    pub fn new(
        max_vocab_size: usize,
        model: VocabularyModel,
        matrix: FeatureMatrix,
        index: CatalogIndex,
    ) -> Result<Self> {
        Self::assemble(Uuid::new_v4(), Utc::now(), max_vocab_size, model, matrix, index)
    }

    fn assemble(
        generation: Uuid,
        built_at: DateTime<Utc>,
        max_vocab_size: usize,
        model: VocabularyModel,
        matrix: FeatureMatrix,
        index: CatalogIndex,
    ) -> Result<Self> {
        matrix
            .validate()
            .map_err(|e| AppError::CorruptArtifact(e.to_string()))?;

        if model.len() != matrix.cols() {
            return Err(AppError::CorruptArtifact(format!(
                "vocabulary has {} terms, matrix has {} columns",
                model.len(),
                matrix.cols()
            )));
        }
        if matrix.rows() != index.len() {
            return Err(VectorSpaceError::IndexAlignmentError {
                matrix_rows: matrix.rows(),
                index_rows: index.len(),
            }
            .into());
        }

        let ratings = index.ratings();
        Ok(Self {
            format_version: BUNDLE_FORMAT_VERSION,
            generation,
            built_at,
            max_vocab_size,
            model,
            matrix,
            index,
            ratings,
        })
    }

    /// Fit the vector space over the rows' feature strings and index the rows.
    pub fn train(rows: &[GameRow], max_vocab_size: usize) -> Result<Self> {
        let corpus: Vec<&str> = rows.iter().map(|r| r.features.as_str()).collect();
        let (model, matrix) = fit(&corpus, max_vocab_size)?;
        let index = CatalogIndex::from_rows(rows);

        let bundle = Self::new(max_vocab_size, model, matrix, index)?;
        info!(
            generation = %bundle.generation,
            items = bundle.len(),
            vocabulary = bundle.model.len(),
            nnz = bundle.matrix.nnz(),
            "Trained artifact bundle"
        );
        Ok(bundle)
    }

    /// Rank the catalog against a preference and join the rows back onto the index.
    pub fn recommend(
        &self,
        query: &PreferenceQuery,
        top_k: usize,
        alpha: f32,
    ) -> Result<Vec<RecommendedGame>> {
        let tokens = query.tokens();
        let vector = encode(&tokens, &self.model);
        debug!(
            tokens = ?tokens,
            matched = vector.nnz(),
            top_k = top_k,
            alpha = alpha,
            "Encoded preference query"
        );

        let ranked = rank(&vector, &self.matrix, &self.ratings, alpha, top_k)?;

        ranked
            .into_iter()
            .map(|scored| {
                self.index
                    .get(scored.row)
                    .map(|entry| entry.recommend(scored.score))
                    .ok_or_else(|| {
                        AppError::from(VectorSpaceError::IndexAlignmentError {
                            matrix_rows: self.matrix.rows(),
                            index_rows: self.index.len(),
                        })
                    })
            })
            .collect()
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            generation: self.generation,
            format_version: self.format_version,
            built_at: self.built_at,
            items: self.len(),
            vocabulary_size: self.model.len(),
            max_vocab_size: self.max_vocab_size,
        }
    }

    pub fn generation(&self) -> Uuid {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn model(&self) -> &VocabularyModel {
        &self.model
    }

    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_vector::feature_string;

    fn row(name: &str, rating: f32, genres: &[&str], platforms: &[&str]) -> GameRow {
        let genres: Vec<String> = genres.iter().map(|g| g.to_string()).collect();
        let platforms: Vec<String> = platforms.iter().map(|p| p.to_string()).collect();
        let tags: Vec<String> = Vec::new();
        GameRow {
            name: name.to_string(),
            image: format!("{}.png", name.to_lowercase()),
            rating,
            ratings_count: 10,
            features: feature_string(&genres, &platforms, &tags),
            genres,
            platforms,
            tags,
        }
    }

    fn abc_rows() -> Vec<GameRow> {
        vec![
            row("A", 5.0, &["Action"], &[]),
            row("B", 1.0, &["Action"], &[]),
            row("C", 3.0, &["Puzzle"], &[]),
        ]
    }

    fn action() -> PreferenceQuery {
        PreferenceQuery {
            genre: Some("Action".to_string()),
            platform: None,
        }
    }

    fn names(games: &[RecommendedGame]) -> Vec<&str> {
        games.iter().map(|g| g.name.as_str()).collect()
    }

    #[test]
    fn test_similarity_only_keeps_catalog_order_on_ties() {
        let bundle = ArtifactBundle::train(&abc_rows(), 5000).unwrap();
        let games = bundle.recommend(&action(), 20, 1.0).unwrap();

        assert_eq!(names(&games), vec!["A", "B", "C"]);
        assert_eq!(games[0].genres, "Action");
        assert_eq!(games[0].image, "a.png");
    }

    #[test]
    fn test_popularity_only_orders_by_rating() {
        let bundle = ArtifactBundle::train(&abc_rows(), 5000).unwrap();
        let games = bundle.recommend(&action(), 20, 0.0).unwrap();

        assert_eq!(names(&games), vec!["A", "C", "B"]);
        assert!((games[0].score - 1.0).abs() < 1e-6);
        assert!((games[1].score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_default_blend() {
        let bundle = ArtifactBundle::train(&abc_rows(), 5000).unwrap();
        let games = bundle.recommend(&action(), 2, 0.8).unwrap();

        assert_eq!(names(&games), vec!["A", "B"]);
        assert!((games[0].score - 1.0).abs() < 1e-6);
        assert!((games[1].score - 0.84).abs() < 1e-5);
    }

    #[test]
    fn test_empty_preference_ranks_by_popularity() {
        let bundle = ArtifactBundle::train(&abc_rows(), 5000).unwrap();
        let games = bundle
            .recommend(&PreferenceQuery::default(), 3, 0.8)
            .unwrap();

        assert_eq!(names(&games), vec!["A", "C", "B"]);
        assert!(games[0].score <= 0.2 + 1e-6);
    }

    #[test]
    fn test_top_k_zero_is_rejected() {
        let bundle = ArtifactBundle::train(&abc_rows(), 5000).unwrap();
        assert!(matches!(
            bundle.recommend(&action(), 0, 0.8),
            Err(AppError::Engine(VectorSpaceError::InvalidArgumentError(_)))
        ));
    }

    #[test]
    fn test_train_rejects_empty_catalog() {
        assert!(matches!(
            ArtifactBundle::train(&[], 5000),
            Err(AppError::Engine(VectorSpaceError::EmptyCorpusError))
        ));
    }

    #[test]
    fn test_misaligned_index_is_rejected() {
        let trained = ArtifactBundle::train(&abc_rows(), 5000).unwrap();
        let short_index = CatalogIndex::from_rows(&abc_rows()[..2]);

        let err = ArtifactBundle::new(
            5000,
            trained.model().clone(),
            trained.matrix().clone(),
            short_index,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::Engine(VectorSpaceError::IndexAlignmentError {
                matrix_rows: 3,
                index_rows: 2
            })
        ));
    }

    #[test]
    fn test_deserializing_misaligned_bundle_fails() {
        let bundle = ArtifactBundle::train(&abc_rows(), 5000).unwrap();
        let mut value = serde_json::to_value(&bundle).unwrap();
        value["index"].as_array_mut().unwrap().pop();

        assert!(serde_json::from_value::<ArtifactBundle>(value).is_err());
    }

    #[test]
    fn test_deserializing_unknown_version_fails() {
        let bundle = ArtifactBundle::train(&abc_rows(), 5000).unwrap();
        let mut value = serde_json::to_value(&bundle).unwrap();
        value["format_version"] = serde_json::json!(BUNDLE_FORMAT_VERSION + 1);

        let err = serde_json::from_value::<ArtifactBundle>(value).unwrap_err();
        assert!(err.to_string().contains("format version"));
    }

    #[test]
    fn test_json_round_trip_keeps_generation() {
        let bundle = ArtifactBundle::train(&abc_rows(), 5000).unwrap();
        let json = serde_json::to_string(&bundle).unwrap();
        let loaded: ArtifactBundle = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.generation(), bundle.generation());
        assert_eq!(loaded.model_info().items, 3);
        assert_eq!(
            loaded.recommend(&action(), 3, 0.8).unwrap(),
            bundle.recommend(&action(), 3, 0.8).unwrap()
        );
    }
}
