/// Sparse vectors and the compressed-row feature matrix.
use crate::error::{Result, VectorSpaceError};
use serde::{Deserialize, Serialize};

/// Sparse row vector: strictly increasing column indices with matching weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f32>,
}

impl SparseVector {
    /// All-zero vector of the given dimensionality
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from (column, weight) pairs. Pairs are sorted by column, zero weights dropped.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(usize, f32)>) -> Result<Self> {
        pairs.sort_by_key(|(col, _)| *col);
        pairs.retain(|(_, w)| *w != 0.0);

        let mut indices = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (col, weight) in pairs {
            if col >= dim {
                return Err(VectorSpaceError::InvalidArgumentError(format!(
                    "column {} out of bounds for dimension {}",
                    col, dim
                )));
            }
            if indices.last() == Some(&col) {
                return Err(VectorSpaceError::InvalidArgumentError(format!(
                    "duplicate column {}",
                    col
                )));
            }
            indices.push(col);
            values.push(weight);
        }

        Ok(Self {
            dim,
            indices,
            values,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn norm(&self) -> f32 {
        l2_norm(&self.values)
    }

    /// Scale to unit length; the zero vector stays zero.
    pub fn normalize(&mut self) {
        normalize_in_place(&mut self.values);
    }

    /// Weight at `col`, 0.0 when absent
    pub fn get(&self, col: usize) -> f32 {
        self.indices
            .binary_search(&col)
            .map(|pos| self.values[pos])
            .unwrap_or(0.0)
    }
}

/// Borrowed view of one matrix row
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    pub indices: &'a [usize],
    pub values: &'a [f32],
}

impl SparseRow<'_> {
    pub fn norm(&self) -> f32 {
        l2_norm(self.values)
    }

    /// Dot product against a sparse vector (merge over sorted indices)
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;

        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }
}

/// Compressed sparse row matrix: one row per catalog item, one column per vocabulary term.
///
/// Row `i` always describes catalog item `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f32>,
}

impl FeatureMatrix {
    /// Empty matrix with a fixed column count, rows appended with `push_row`
    pub fn with_columns(n_cols: usize) -> Self {
        Self {
            n_cols,
            indptr: vec![0],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: SparseVector) -> Result<()> {
        if row.dim != self.n_cols {
            return Err(VectorSpaceError::InvalidArgumentError(format!(
                "row dimension {} does not match matrix columns {}",
                row.dim, self.n_cols
            )));
        }

        self.indices.extend(row.indices);
        self.data.extend(row.values);
        self.indptr.push(self.indices.len());
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.indptr.len().saturating_sub(1)
    }

    pub fn cols(&self) -> usize {
        self.n_cols
    }

    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.n_cols)
    }

    pub fn row(&self, i: usize) -> Option<SparseRow<'_>> {
        let start = *self.indptr.get(i)?;
        let end = *self.indptr.get(i + 1)?;
        Some(SparseRow {
            indices: &self.indices[start..end],
            values: &self.data[start..end],
        })
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = SparseRow<'_>> + '_ {
        self.indptr.windows(2).map(move |w| SparseRow {
            indices: &self.indices[w[0]..w[1]],
            values: &self.data[w[0]..w[1]],
        })
    }

    /// Structural check for matrices that did not come out of `fit` (e.g. decoded from disk).
    pub fn validate(&self) -> Result<()> {
        let corrupt = |msg: String| Err(VectorSpaceError::InvalidArgumentError(msg));

        if self.indptr.first() != Some(&0) {
            return corrupt("row pointer must start at 0".to_string());
        }
        if self.indices.len() != self.data.len() {
            return corrupt(format!(
                "{} column indices but {} values",
                self.indices.len(),
                self.data.len()
            ));
        }
        if self.indptr.last() != Some(&self.indices.len()) {
            return corrupt("row pointer does not cover all stored values".to_string());
        }

        for w in self.indptr.windows(2) {
            if w[0] > w[1] {
                return corrupt("row pointer is not monotonic".to_string());
            }
            let Some(cols) = self.indices.get(w[0]..w[1]) else {
                return corrupt("row pointer exceeds stored values".to_string());
            };
            if cols.windows(2).any(|c| c[0] >= c[1]) {
                return corrupt("column indices within a row must be strictly increasing".to_string());
            }
            if cols.last().is_some_and(|&c| c >= self.n_cols) {
                return corrupt(format!("column index out of bounds for {} columns", self.n_cols));
            }
        }

        if self.data.iter().any(|v| !v.is_finite()) {
            return corrupt("matrix holds non-finite weights".to_string());
        }

        Ok(())
    }
}

pub(crate) fn l2_norm(values: &[f32]) -> f32 {
    values.iter().map(|x| x * x).sum::<f32>().sqrt()
}

pub(crate) fn normalize_in_place(values: &mut [f32]) {
    let norm = l2_norm(values);
    if norm > 0.0 {
        values.iter_mut().for_each(|x| *x /= norm);
    }
}
