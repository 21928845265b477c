use std::path::Path;

use crate::artifact;
use crate::error::{Error, Result};
use crate::model::{Catalog, SimilarityMatrix};

/// Asymmetry above this is reported when a library is loaded.
const ASYMMETRY_TOLERANCE: f64 = 1e-6;

/// A catalog paired with its similarity matrix.
///
/// Construction guarantees the matrix has exactly one row per catalog item,
/// so every catalog index is a valid matrix row. A library is immutable and
/// can be shared freely between concurrent readers.
#[derive(Debug, Clone)]
pub struct Library {
    catalog: Catalog,
    similarity: SimilarityMatrix,
}

impl Library {
    /// Pair a catalog with its similarity matrix.
    ///
    /// # Errors
    /// Returns [`Error::DimensionMismatch`] if the matrix size differs from
    /// the number of catalog items.
    pub fn new(catalog: Catalog, similarity: SimilarityMatrix) -> Result<Self> {
        if catalog.len() != similarity.len() {
            return Err(Error::DimensionMismatch {
                catalog: catalog.len(),
                matrix: similarity.len(),
            });
        }
        Ok(Self {
            catalog,
            similarity,
        })
    }

    /// Load both artifacts from disk and validate their alignment.
    ///
    /// Duplicate titles and asymmetric scores are not errors, but are logged
    /// as warnings.
    ///
    /// # Errors
    /// Returns an error if either artifact fails to load or their sizes
    /// disagree.
    pub fn load(catalog_path: &Path, similarity_path: &Path) -> Result<Self> {
        let catalog = artifact::load_catalog(catalog_path)?;
        let similarity = artifact::load_similarity(similarity_path)?;
        let library = Self::new(catalog, similarity)?;

        let duplicates = library.catalog.duplicate_titles();
        if !duplicates.is_empty() {
            log::warn!(
                "{} titles appear on more than one catalog row; title lookups use the first row (e.g. {:?})",
                duplicates.len(),
                duplicates.first()
            );
        }

        let asymmetry = library.similarity.max_asymmetry();
        if asymmetry > ASYMMETRY_TOLERANCE {
            log::warn!("Similarity matrix is not symmetric (max deviation {asymmetry:.6})");
        }

        log::info!("Loaded library with {} items", library.len());
        Ok(library)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CatalogItem;
    use tempfile::TempDir;

    fn catalog(n: usize) -> Catalog {
        (0..n)
            .map(|i| CatalogItem::new(format!("Song {i}"), format!("Artist {i}")))
            .collect()
    }

    fn identity(n: usize) -> SimilarityMatrix {
        SimilarityMatrix::from_rows(
            (0..n)
                .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_aligned() {
        let library = Library::new(catalog(3), identity(3)).unwrap();
        assert_eq!(library.len(), 3);
        assert_eq!(library.catalog()[2].title, "Song 2");
        assert_eq!(library.similarity().len(), 3);
    }

    #[test]
    fn test_new_dimension_mismatch() {
        let err = Library::new(catalog(3), identity(2)).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                catalog: 3,
                matrix: 2
            }
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = TempDir::new().unwrap();
        let catalog_path = dir.path().join("catalog.json");
        let similarity_path = dir.path().join("similarity.json");
        std::fs::write(
            &catalog_path,
            r#"[{"title": "A", "artist": "x"}, {"title": "B", "artist": "y"}]"#,
        )
        .unwrap();
        std::fs::write(&similarity_path, "[[1.0, 0.4], [0.4, 1.0]]").unwrap();

        let library = Library::load(&catalog_path, &similarity_path).unwrap();
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_load_rejects_misaligned_artifacts() {
        let dir = TempDir::new().unwrap();
        let catalog_path = dir.path().join("catalog.json");
        let similarity_path = dir.path().join("similarity.json");
        std::fs::write(&catalog_path, r#"[{"title": "A", "artist": "x"}]"#).unwrap();
        std::fs::write(&similarity_path, "[[1.0, 0.4], [0.4, 1.0]]").unwrap();

        let err = Library::load(&catalog_path, &similarity_path).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }
}
