/// Vocabulary Model + Vector Space Builder
///
/// Fits a smoothed TF-IDF vocabulary over the per-item feature strings and emits the
/// L2-normalized row matrix used for cosine similarity.
///
/// # Weighting
/// - `tf(t, d)`: occurrences of `t` in item `d`'s feature string
/// - `idf(t) = ln((1 + N) / (1 + df(t))) + 1`
/// - every row is scaled to unit length so cosine similarity is a plain dot product
use crate::error::{Result, VectorSpaceError};
use crate::sparse::{FeatureMatrix, SparseVector};
use crate::tokenizer::split_features;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Fitted vocabulary: token → column, plus per-column IDF. Immutable after `fit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredVocabulary", into = "StoredVocabulary")]
pub struct VocabularyModel {
    /// Column order (lexicographic)
    terms: Vec<String>,
    term_index: HashMap<String, usize>,
    idf: Vec<f32>,
    /// Number of items the model was fit on
    documents: usize,
}

/// On-disk shape of the vocabulary; the lookup table is rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredVocabulary {
    terms: Vec<String>,
    idf: Vec<f32>,
    documents: usize,
}

impl TryFrom<StoredVocabulary> for VocabularyModel {
    type Error = VectorSpaceError;

    fn try_from(stored: StoredVocabulary) -> Result<Self> {
        if stored.terms.len() != stored.idf.len() {
            return Err(VectorSpaceError::InvalidArgumentError(format!(
                "vocabulary has {} terms but {} idf weights",
                stored.terms.len(),
                stored.idf.len()
            )));
        }
        if stored.terms.windows(2).any(|w| w[0] >= w[1]) {
            return Err(VectorSpaceError::InvalidArgumentError(
                "vocabulary terms must be unique and sorted".to_string(),
            ));
        }
        if stored.idf.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(VectorSpaceError::InvalidArgumentError(
                "idf weights must be finite and positive".to_string(),
            ));
        }

        Ok(Self::from_parts(stored.terms, stored.idf, stored.documents))
    }
}

impl From<VocabularyModel> for StoredVocabulary {
    fn from(model: VocabularyModel) -> Self {
        Self {
            terms: model.terms,
            idf: model.idf,
            documents: model.documents,
        }
    }
}

impl VocabularyModel {
    fn from_parts(terms: Vec<String>, idf: Vec<f32>, documents: usize) -> Self {
        let term_index = terms
            .iter()
            .enumerate()
            .map(|(col, term)| (term.clone(), col))
            .collect();

        Self {
            terms,
            term_index,
            idf,
            documents,
        }
    }

    /// Vocabulary size (= matrix column count)
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.term_index.get(term).copied()
    }

    pub fn idf(&self, column: usize) -> Option<f32> {
        self.idf.get(column).copied()
    }

    /// TF-IDF weigh already-normalized tokens and scale the result to unit length.
    ///
    /// Out-of-vocabulary tokens are skipped; if none remain the zero vector is returned.
    pub(crate) fn weigh<'a, I>(&self, tokens: I) -> SparseVector
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tf: HashMap<usize, f32> = HashMap::new();
        for token in tokens {
            if let Some(col) = self.column(token) {
                *tf.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let pairs = tf
            .into_iter()
            .map(|(col, count)| (col, count * self.idf[col]))
            .collect();

        // columns come from term_index, so they are always in bounds
        let mut vector = SparseVector::from_pairs(self.len(), pairs)
            .unwrap_or_else(|_| SparseVector::zeros(self.len()));
        vector.normalize();
        vector
    }
}

/// Smoothed inverse document frequency
fn smoothed_idf(documents: usize, document_frequency: usize) -> f32 {
    (((1 + documents) as f64 / (1 + document_frequency) as f64).ln() + 1.0) as f32
}

/// Fit the vocabulary over the corpus and build the item matrix.
///
/// Row `i` of the returned matrix corresponds to `corpus[i]`.
///
/// # Errors
/// - `EmptyCorpusError` when the corpus has no items
/// - `EmptyVocabularyError` when no item has any token
/// - `InvalidArgumentError` when `max_vocab_size` is 0
pub fn fit<S: AsRef<str>>(
    corpus: &[S],
    max_vocab_size: usize,
) -> Result<(VocabularyModel, FeatureMatrix)> {
    if corpus.is_empty() {
        return Err(VectorSpaceError::EmptyCorpusError);
    }
    if max_vocab_size == 0 {
        return Err(VectorSpaceError::InvalidArgumentError(
            "max_vocab_size must be at least 1".to_string(),
        ));
    }

    let tokenized: Vec<Vec<&str>> = corpus
        .iter()
        .map(|doc| split_features(doc.as_ref()).collect())
        .collect();

    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for tokens in &tokenized {
        let unique: HashSet<&str> = tokens.iter().copied().collect();
        for term in unique {
            *document_frequency.entry(term).or_insert(0) += 1;
        }
    }

    if document_frequency.is_empty() {
        return Err(VectorSpaceError::EmptyVocabularyError);
    }

    let distinct_terms = document_frequency.len();
    let mut selected: Vec<(&str, usize)> = document_frequency.into_iter().collect();
    if selected.len() > max_vocab_size {
        // highest df first, lexicographic among equal df
        selected.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        selected.truncate(max_vocab_size);
    }
    selected.sort_by(|a, b| a.0.cmp(b.0));

    let documents = corpus.len();
    let terms: Vec<String> = selected.iter().map(|(term, _)| term.to_string()).collect();
    let idf: Vec<f32> = selected
        .iter()
        .map(|(_, df)| smoothed_idf(documents, *df))
        .collect();
    let model = VocabularyModel::from_parts(terms, idf, documents);

    let mut matrix = FeatureMatrix::with_columns(model.len());
    for tokens in &tokenized {
        matrix.push_row(model.weigh(tokens.iter().copied()))?;
    }

    debug!(
        distinct_terms = distinct_terms,
        retained_terms = model.len(),
        "Vocabulary selected"
    );
    info!(
        rows = matrix.rows(),
        cols = matrix.cols(),
        nnz = matrix.nnz(),
        "Fitted TF-IDF vector space"
    );

    Ok((model, matrix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_empty_corpus() {
        let corpus: Vec<String> = Vec::new();
        assert_eq!(
            fit(&corpus, 10).unwrap_err(),
            VectorSpaceError::EmptyCorpusError
        );
    }

    #[test]
    fn test_fit_empty_vocabulary() {
        assert_eq!(
            fit(&["", "   "], 10).unwrap_err(),
            VectorSpaceError::EmptyVocabularyError
        );
    }

    #[test]
    fn test_fit_zero_max_vocab() {
        assert!(matches!(
            fit(&["action"], 0),
            Err(VectorSpaceError::InvalidArgumentError(_))
        ));
    }

    #[test]
    fn test_idf_values() {
        let (model, _) = fit(&["action pc", "action", "puzzle"], 10).unwrap();

        // N = 3; df(action) = 2, df(pc) = df(puzzle) = 1
        let action = model.idf(model.column("action").unwrap()).unwrap();
        let pc = model.idf(model.column("pc").unwrap()).unwrap();
        assert!((action - ((4.0f32 / 3.0).ln() + 1.0)).abs() < 1e-6);
        assert!((pc - ((4.0f32 / 2.0).ln() + 1.0)).abs() < 1e-6);

        // a term present everywhere still gets a positive weight
        let (model, _) = fit(&["pc", "pc"], 10).unwrap();
        assert!((model.idf(0).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_columns_are_lexicographic() {
        let (model, matrix) = fit(&["shooter action", "rpg"], 10).unwrap();
        assert_eq!(model.terms(), &["action", "rpg", "shooter"]);
        assert_eq!(matrix.cols(), 3);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let corpus = ["action action pc", "puzzle", "", "rpg pc xbox_one"];
        let (_, matrix) = fit(&corpus, 10).unwrap();

        assert_eq!(matrix.rows(), 4);
        for (i, row) in matrix.iter_rows().enumerate() {
            if i == 2 {
                assert!(row.indices.is_empty());
            } else {
                assert!((row.norm() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_term_frequency_counts_duplicates() {
        let (model, matrix) = fit(&["action action pc", "pc"], 10).unwrap();
        let row = matrix.row(0).unwrap();

        let action_col = model.column("action").unwrap();
        let pc_col = model.column("pc").unwrap();
        let weight = |col: usize| {
            row.indices
                .iter()
                .position(|&c| c == col)
                .map(|p| row.values[p])
                .unwrap()
        };

        // raw weights are 2 * idf(action) and 1 * idf(pc) before normalization
        let expected_ratio = 2.0 * model.idf(action_col).unwrap() / model.idf(pc_col).unwrap();
        assert!((weight(action_col) / weight(pc_col) - expected_ratio).abs() < 1e-5);
    }

    #[test]
    fn test_vocabulary_cap_keeps_highest_df() {
        // df: action=3, pc=2, puzzle=1, rpg=1
        let corpus = ["action pc rpg", "action pc", "action puzzle"];
        let (model, matrix) = fit(&corpus, 3).unwrap();

        // puzzle and rpg tie on df=1, lexicographic order keeps puzzle
        assert_eq!(model.terms(), &["action", "pc", "puzzle"]);
        assert_eq!(matrix.cols(), 3);
        assert!(model.column("rpg").is_none());
    }

    #[test]
    fn test_serde_rebuilds_lookup() {
        let (model, _) = fit(&["action pc", "puzzle"], 10).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let restored: VocabularyModel = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, model);
        assert_eq!(restored.column("puzzle"), model.column("puzzle"));
    }

    #[test]
    fn test_serde_rejects_inconsistent_vocabulary() {
        let json = r#"{"terms":["b","a"],"idf":[1.0,1.0],"documents":2}"#;
        assert!(serde_json::from_str::<VocabularyModel>(json).is_err());

        let json = r#"{"terms":["a"],"idf":[1.0,2.0],"documents":2}"#;
        assert!(serde_json::from_str::<VocabularyModel>(json).is_err());
    }
}
