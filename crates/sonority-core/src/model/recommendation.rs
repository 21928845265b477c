use serde::{Deserialize, Serialize};

/// A catalog item ranked against the selected item.
///
/// Recommendations are created per query and carry no persistent identity
/// beyond the catalog row they point at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Catalog row of the recommended item.
    pub index: usize,
    pub title: String,
    pub artist: String,
    /// Similarity to the selected item.
    pub score: f64,
}

/// The first `MusicBrainz` recording matching an (artist, title) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    /// `MusicBrainz` recording ID.
    pub id: String,
    pub title: String,
    /// Credited artist names joined with `", "`.
    pub artist_name: String,
    pub release_date: Option<String>,
    pub genre: Option<String>,
}

/// A recommendation plus best-effort fields fetched from external services.
///
/// Every enriched field is optional; `None` means the lookup found nothing
/// or failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecommendation {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub metadata: Option<RecordingMetadata>,
    pub cover_art_url: Option<String>,
}

impl EnrichedRecommendation {
    /// Wrap a recommendation with no enriched fields.
    #[must_use]
    pub fn bare(recommendation: Recommendation) -> Self {
        Self {
            recommendation,
            metadata: None,
            cover_art_url: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Option<RecordingMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn with_cover_art(mut self, url: Option<String>) -> Self {
        self.cover_art_url = url;
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.recommendation.title
    }

    #[must_use]
    pub fn artist(&self) -> &str {
        &self.recommendation.artist
    }

    #[must_use]
    pub fn release_date(&self) -> Option<&str> {
        self.metadata.as_ref()?.release_date.as_deref()
    }

    #[must_use]
    pub fn genre(&self) -> Option<&str> {
        self.metadata.as_ref()?.genre.as_deref()
    }

    #[must_use]
    pub fn recording_id(&self) -> Option<&str> {
        self.metadata.as_ref().map(|m| m.id.as_str())
    }

    #[must_use]
    pub fn cover_art_url(&self) -> Option<&str> {
        self.cover_art_url.as_deref()
    }
}
