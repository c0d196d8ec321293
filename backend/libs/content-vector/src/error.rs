use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VectorSpaceError {
    #[error("Cannot fit a vector space over an empty corpus")]
    EmptyCorpusError,

    #[error("Corpus produced no tokens, vocabulary would be empty")]
    EmptyVocabularyError,

    #[error("Index alignment broken: matrix has {matrix_rows} rows, index has {index_rows}")]
    IndexAlignmentError {
        matrix_rows: usize,
        index_rows: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),
}

pub type Result<T> = std::result::Result<T, VectorSpaceError>;
