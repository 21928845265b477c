use crate::error::{Error, Result};

/// Square matrix of precomputed similarity scores.
///
/// Row `i` holds the similarity of catalog item `i` to every item, including
/// itself. Scores are stored row-major and are always finite. Symmetry is a
/// convention of the producer and is not enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Build a matrix from nested rows.
    ///
    /// # Errors
    /// Returns [`Error::InvalidData`] if any row length differs from the
    /// number of rows, or if any score is NaN or infinite.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        let mut scores = Vec::with_capacity(size * size);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(Error::InvalidData(format!(
                    "similarity row {i} has {} columns, expected {size}",
                    row.len()
                )));
            }
            if let Some(j) = row.iter().position(|score| !score.is_finite()) {
                return Err(Error::InvalidData(format!(
                    "similarity score at ({i}, {j}) is not finite"
                )));
            }
            scores.extend(row);
        }

        Ok(Self { size, scores })
    }

    /// Number of rows (and columns).
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Scores of item `index` against every item, or `None` if out of range.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.size {
            return None;
        }
        let start = index * self.size;
        Some(&self.scores[start..start + self.size])
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.row(i).and_then(|row| row.get(j).copied())
    }

    /// Largest `|s(i, j) - s(j, i)|` over all cell pairs.
    #[must_use]
    pub fn max_asymmetry(&self) -> f64 {
        let mut worst = 0.0_f64;
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let delta = (self.scores[i * self.size + j] - self.scores[j * self.size + i]).abs();
                worst = worst.max(delta);
            }
        }
        worst
    }
}
