/// Query Encoder
///
/// Maps preference tokens (genre, platform) into the fitted vector space. Tokens get the
/// same normalization and TF-IDF weighting as catalog rows, then the row is L2-normalized,
/// so its dot product with a matrix row is the cosine similarity.
use crate::sparse::SparseVector;
use crate::tokenizer::normalize_token;
use crate::vocabulary::VocabularyModel;

/// Encode raw preference tokens against a fitted model.
///
/// Unknown tokens are dropped; an empty or fully out-of-vocabulary input yields the zero
/// vector, which ranks purely on popularity.
pub fn encode<S: AsRef<str>>(tokens: &[S], model: &VocabularyModel) -> SparseVector {
    let normalized: Vec<String> = tokens
        .iter()
        .filter_map(|t| normalize_token(t.as_ref()))
        .collect();

    model.weigh(normalized.iter().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::fit;

    fn model() -> VocabularyModel {
        fit(&["action pc", "action playstation_5", "puzzle pc"], 10)
            .unwrap()
            .0
    }

    #[test]
    fn test_encode_normalizes_tokens() {
        let model = model();
        let query = encode(&["Action", "PlayStation 5"], &model);

        assert_eq!(query.nnz(), 2);
        assert!(query.get(model.column("playstation_5").unwrap()) > 0.0);
        assert!((query.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_encode_drops_oov_tokens() {
        let model = model();
        let query = encode(&["Racing", "PC"], &model);

        assert_eq!(query.nnz(), 1);
        assert!((query.get(model.column("pc").unwrap()) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_encode_all_oov_is_zero_vector() {
        let model = model();

        let query = encode(&["Racing", "Dreamcast"], &model);
        assert!(query.is_zero());
        assert_eq!(query.dim(), model.len());

        let empty: [&str; 0] = [];
        assert!(encode(&empty, &model).is_zero());
    }

    #[test]
    fn test_encode_weights_follow_idf() {
        let model = model();
        let query = encode(&["action", "playstation_5"], &model);

        // df(action) = 2 > df(playstation_5) = 1, so action carries less weight
        let action = query.get(model.column("action").unwrap());
        let ps5 = query.get(model.column("playstation_5").unwrap());
        assert!(action < ps5);
    }
}
