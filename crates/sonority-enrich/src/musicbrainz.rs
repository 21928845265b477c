//! MusicBrainz recording search.
//!
//! Searches the MusicBrainz web service for a recording by exact artist and
//! title phrase and returns the top match as [`RecordingMetadata`]: title,
//! joined artist credit, first release date, genre, and recording ID.

use reqwest::Client;
use serde::Deserialize;

use sonority_core::model::RecordingMetadata;

use crate::config::ClientSettings;
use crate::error::{EnrichError, EnrichResult};
use crate::query;
use crate::resilience::{self, RateLimiter};

const SOURCE_NAME: &str = "MusicBrainz";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RecordingSearchResponse {
    #[serde(default)]
    recordings: Vec<MbRecording>,
}

#[derive(Debug, Deserialize)]
pub struct MbRecording {
    pub id: String,
    pub title: String,
    #[serde(rename = "artist-credit", default)]
    pub artist_credit: Vec<MbArtistCredit>,
    #[serde(rename = "first-release-date")]
    pub first_release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<MbTag>,
    #[serde(default)]
    pub tags: Vec<MbTag>,
}

#[derive(Debug, Deserialize)]
pub struct MbArtistCredit {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MbTag {
    pub name: String,
    #[serde(default)]
    pub count: i64,
}

impl MbRecording {
    /// The first genre, falling back to the most-voted folksonomy tag.
    fn genre(&self) -> Option<String> {
        self.genres
            .first()
            .or_else(|| self.tags.iter().max_by_key(|tag| tag.count))
            .map(|tag| tag.name.clone())
    }

    fn into_metadata(self) -> RecordingMetadata {
        let genre = self.genre();
        let artist_name = self
            .artist_credit
            .iter()
            .map(|credit| credit.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        RecordingMetadata {
            id: self.id,
            title: self.title,
            artist_name,
            release_date: self.first_release_date.filter(|date| !date.is_empty()),
            genre,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// MusicBrainz API client.
///
/// Requests are rate-limited to the configured rate (1 req/sec by default,
/// as required by MusicBrainz).
#[derive(Debug, Clone)]
pub struct MusicBrainzClient {
    http: Client,
    base_url: String,
    retries: usize,
    rate_limiter: RateLimiter,
}

impl MusicBrainzClient {
    /// Create a new MusicBrainz client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: &ClientSettings) -> EnrichResult<Self> {
        Ok(Self {
            http: settings.http_client()?,
            base_url: settings.base().to_string(),
            retries: settings.retries,
            rate_limiter: RateLimiter::new(settings.requests_per_second),
        })
    }

    /// Search for the best recording matching `artist` and `title`.
    ///
    /// Returns `Ok(None)` when the search has no results.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status, or an
    /// unparseable body.
    pub async fn search_recording(
        &self,
        artist: &str,
        title: &str,
    ) -> EnrichResult<Option<RecordingMetadata>> {
        let query = recording_query(artist, title);
        resilience::with_retries(SOURCE_NAME, self.retries, || self.search_once(&query)).await
    }

    async fn search_once(&self, query: &str) -> EnrichResult<Option<RecordingMetadata>> {
        self.rate_limiter.acquire().await;

        let url = format!("{}/recording/", self.base_url);
        log::debug!("MusicBrainz recording search: {query}");

        let response = self
            .http
            .get(&url)
            .query(&[("query", query), ("fmt", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::from_status(SOURCE_NAME, status));
        }

        let result: RecordingSearchResponse =
            response.json().await.map_err(|e| EnrichError::Parse {
                source_name: SOURCE_NAME.to_string(),
                message: e.to_string(),
            })?;

        Ok(result
            .recordings
            .into_iter()
            .next()
            .map(MbRecording::into_metadata))
    }
}

/// Exact-phrase search on both artist and recording title.
fn recording_query(artist: &str, title: &str) -> String {
    query::fielded(&[("artist", artist), ("recording", title)], " AND ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_musicbrainz_client_creation() {
        let client = MusicBrainzClient::new(&Config::default().musicbrainz_settings());
        assert!(client.is_ok());
        let debug = format!("{:?}", client.unwrap());
        assert!(debug.contains("RateLimiter"));
    }

    #[test]
    fn test_recording_query() {
        assert_eq!(
            recording_query("Nina Simone", "Feeling Good"),
            r#"artist:"Nina Simone" AND recording:"Feeling Good""#
        );
    }

    #[test]
    fn test_search_response_deserialize() {
        let json = r#"{
            "created": "2024-01-01T00:00:00.000Z",
            "count": 1,
            "offset": 0,
            "recordings": [{
                "id": "b1a9c0e9-d987-4042-ae91-78d6a3267d69",
                "score": 100,
                "title": "Feeling Good",
                "length": 177000,
                "artist-credit": [
                    {"name": "Nina Simone", "artist": {"id": "a1", "name": "Nina Simone"}},
                    {"name": "Hal Mooney", "artist": {"id": "a2", "name": "Hal Mooney"}}
                ],
                "first-release-date": "1965-06",
                "tags": [
                    {"count": 2, "name": "soul"},
                    {"count": 7, "name": "jazz"}
                ]
            }]
        }"#;
        let response: RecordingSearchResponse = serde_json::from_str(json).unwrap();
        let metadata = response
            .recordings
            .into_iter()
            .next()
            .unwrap()
            .into_metadata();

        assert_eq!(metadata.id, "b1a9c0e9-d987-4042-ae91-78d6a3267d69");
        assert_eq!(metadata.title, "Feeling Good");
        assert_eq!(metadata.artist_name, "Nina Simone, Hal Mooney");
        assert_eq!(metadata.release_date.as_deref(), Some("1965-06"));
        assert_eq!(metadata.genre.as_deref(), Some("jazz"));
    }

    #[test]
    fn test_genres_take_precedence_over_tags() {
        let json = r#"{
            "id": "r1",
            "title": "So What",
            "genres": [{"count": 1, "name": "modal jazz"}],
            "tags": [{"count": 9, "name": "jazz"}]
        }"#;
        let recording: MbRecording = serde_json::from_str(json).unwrap();
        assert_eq!(recording.genre().as_deref(), Some("modal jazz"));
    }

    #[test]
    fn test_sparse_recording_has_no_optional_fields() {
        let json = r#"{"id": "r2", "title": "Untitled"}"#;
        let metadata = serde_json::from_str::<MbRecording>(json)
            .unwrap()
            .into_metadata();
        assert_eq!(metadata.artist_name, "");
        assert!(metadata.release_date.is_none());
        assert!(metadata.genre.is_none());
    }

    #[test]
    fn test_missing_recordings_field_is_empty() {
        let response: RecordingSearchResponse =
            serde_json::from_str(r#"{"count": 0, "offset": 0}"#).unwrap();
        assert!(response.recordings.is_empty());
    }
}
