//! Loading of the precomputed catalog and similarity artifacts.
//!
//! Both artifacts are JSON documents. The catalog is an array of objects
//! with at least `title` and `artist` fields; the similarity matrix is an
//! array of N arrays of N numbers. Paths ending in `.gz` are decompressed
//! while reading.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::model::{Catalog, SimilarityMatrix};

/// Load the catalog artifact.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let catalog: Catalog = read_json(path)?;
    log::debug!("Loaded {} catalog items from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Load the similarity matrix artifact.
///
/// # Errors
/// Returns an error if the file cannot be read, is not a nested numeric
/// array, is not square, or contains non-finite scores.
pub fn load_similarity(path: &Path) -> Result<SimilarityMatrix> {
    let rows: Vec<Vec<f64>> = read_json(path)?;
    let matrix = SimilarityMatrix::from_rows(rows)?;
    log::debug!(
        "Loaded {0}x{0} similarity matrix from {1}",
        matrix.len(),
        path.display()
    );
    Ok(matrix)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = BufReader::new(File::open(path)?);
    let reader: Box<dyn Read> = if is_gzip(path) {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(serde_json::from_reader(reader)?)
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}
