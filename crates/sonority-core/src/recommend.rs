//! Top-N similarity lookup.
//!
//! The recommender ranks every catalog item by its score in the selected
//! item's similarity row, highest first, and returns the best matches other
//! than the selected item itself. Equal scores keep catalog order, so the
//! output is fully determined by the library and the query.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::library::Library;
use crate::model::Recommendation;

/// Number of recommendations returned when no limit is configured.
pub const DEFAULT_RECOMMENDATION_COUNT: usize = 4;

/// Recommendation engine over a borrowed [`Library`].
#[derive(Debug, Clone, Copy)]
pub struct Recommender<'a> {
    library: &'a Library,
    limit: usize,
}

impl<'a> Recommender<'a> {
    #[must_use]
    pub fn new(library: &'a Library) -> Self {
        Self {
            library,
            limit: DEFAULT_RECOMMENDATION_COUNT,
        }
    }

    /// Return at most `limit` recommendations per query.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Recommend items similar to the first catalog item titled
    /// `selected_title`.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no catalog item has that title.
    pub fn recommend(&self, selected_title: &str) -> Result<Vec<Recommendation>> {
        let index = self
            .library
            .catalog()
            .position(selected_title)
            .ok_or_else(|| Error::NotFound {
                entity: "title",
                id: selected_title.to_string(),
            })?;
        self.recommend_index(index)
    }

    /// Recommend items similar to the catalog item with this exact title and
    /// artist.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no catalog item matches both.
    pub fn recommend_for(&self, title: &str, artist: &str) -> Result<Vec<Recommendation>> {
        let index = self
            .library
            .catalog()
            .position_of(title, artist)
            .ok_or_else(|| Error::NotFound {
                entity: "title",
                id: format!("{title} by {artist}"),
            })?;
        self.recommend_index(index)
    }

    /// Recommend items similar to the catalog item at row `index`.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if `index` is outside the catalog.
    pub fn recommend_index(&self, index: usize) -> Result<Vec<Recommendation>> {
        let row = self
            .library
            .similarity()
            .row(index)
            .ok_or_else(|| Error::NotFound {
                entity: "catalog index",
                id: index.to_string(),
            })?;

        let mut ranked: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
        // Stable: numerically equal scores (including 0.0 and -0.0) stay in
        // ascending index order. Scores are finite, so partial_cmp is total.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let catalog = self.library.catalog();
        let recommendations = ranked
            .into_iter()
            .filter(|(other, _)| *other != index)
            .take(self.limit)
            .map(|(other, score)| {
                let item = &catalog[other];
                Recommendation {
                    index: other,
                    title: item.title.clone(),
                    artist: item.artist.clone(),
                    score,
                }
            })
            .collect();

        Ok(recommendations)
    }
}
