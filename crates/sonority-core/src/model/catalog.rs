use std::collections::{BTreeMap, BTreeSet};
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// A song in the catalog.
///
/// An item's identity is its row position in the [`Catalog`], which is stable
/// for the lifetime of the loaded artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub title: String,
    pub artist: String,
}

impl CatalogItem {
    #[must_use]
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }
}

/// Ordered, immutable table of catalog items indexed `0..len`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    #[must_use]
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// Row index of the first item whose title matches exactly.
    ///
    /// When several rows share a title the lowest index wins.
    #[must_use]
    pub fn position(&self, title: &str) -> Option<usize> {
        self.iter().position(|item| item.title == title)
    }

    /// Row index of the item matching both title and artist.
    #[must_use]
    pub fn position_of(&self, title: &str, artist: &str) -> Option<usize> {
        self.iter()
            .position(|item| item.title == title && item.artist == artist)
    }

    /// Sorted, de-duplicated titles.
    #[must_use]
    pub fn unique_titles(&self) -> Vec<&str> {
        self.iter()
            .map(|item| item.title.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Titles that occur on more than one row, sorted.
    #[must_use]
    pub fn duplicate_titles(&self) -> Vec<&str> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for item in &self.items {
            *counts.entry(item.title.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(title, _)| title)
            .collect()
    }
}

impl Index<usize> for Catalog {
    type Output = CatalogItem;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl FromIterator<CatalogItem> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
