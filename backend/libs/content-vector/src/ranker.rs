/// Similarity Ranker
///
/// Scores every catalog row against a query vector and blends the cosine similarity with
/// normalized popularity:
///
/// `score = alpha * similarity + (1 - alpha) * rating / max_rating`
///
/// Selection is a stable descending sort, so equal scores keep catalog order.
use crate::error::{Result, VectorSpaceError};
use crate::sparse::{FeatureMatrix, SparseVector};
use serde::Serialize;
use tracing::debug;

/// Blend weight used when the caller does not pass one
pub const DEFAULT_ALPHA: f32 = 0.8;

/// One ranked catalog row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredRow {
    /// Position in the feature matrix (= catalog index position)
    pub row: usize,
    pub score: f32,
    pub similarity: f32,
    pub popularity: f32,
}

/// Scale ratings into [0, 1] by the catalog maximum.
///
/// When the maximum is not positive (empty or all-zero catalog) the ratings are returned
/// unchanged.
pub fn normalize_popularity(ratings: &[f32]) -> Vec<f32> {
    let max = ratings.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 {
        ratings.iter().map(|r| r / max).collect()
    } else {
        ratings.to_vec()
    }
}

/// Rank all rows and return the best `top_k`.
///
/// `ratings` are the raw per-row ratings; they are normalized here. `alpha` is used as
/// given, values outside [0, 1] are the caller's concern.
///
/// # Errors
/// - `InvalidArgumentError` when `top_k` is 0 or the query dimension differs from the
///   matrix column count
/// - `IndexAlignmentError` when `ratings` does not have one entry per matrix row
pub fn rank(
    query: &SparseVector,
    matrix: &FeatureMatrix,
    ratings: &[f32],
    alpha: f32,
    top_k: usize,
) -> Result<Vec<ScoredRow>> {
    if top_k == 0 {
        return Err(VectorSpaceError::InvalidArgumentError(
            "top_k must be at least 1".to_string(),
        ));
    }
    if query.dim() != matrix.cols() {
        return Err(VectorSpaceError::InvalidArgumentError(format!(
            "query dimension {} does not match matrix columns {}",
            query.dim(),
            matrix.cols()
        )));
    }
    if ratings.len() != matrix.rows() {
        return Err(VectorSpaceError::IndexAlignmentError {
            matrix_rows: matrix.rows(),
            index_rows: ratings.len(),
        });
    }

    let popularity = normalize_popularity(ratings);

    let mut scored: Vec<ScoredRow> = matrix
        .iter_rows()
        .zip(popularity)
        .enumerate()
        .map(|(row, (features, popularity))| {
            let similarity = if query.is_zero() {
                0.0
            } else {
                features.dot(query)
            };

            ScoredRow {
                row,
                score: alpha * similarity + (1.0 - alpha) * popularity,
                similarity,
                popularity,
            }
        })
        .collect();

    // sort_by is stable; total_cmp keeps the order total even for NaN scores
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);

    debug!(
        candidates = matrix.rows(),
        returned = scored.len(),
        top_score = scored.first().map(|s| s.score),
        "Ranked catalog"
    );

    Ok(scored)
}
