//! Deezer cover-art search.
//!
//! Deezer's public search endpoint needs no API key. The top track hit for
//! an artist and track phrase carries its album's cover art in several
//! sizes; the "big" (500×500) variant is used.

use reqwest::Client;
use serde::Deserialize;

use crate::config::ClientSettings;
use crate::error::{EnrichError, EnrichResult};
use crate::query;
use crate::resilience::{self, RateLimiter};

const SOURCE_NAME: &str = "Deezer";

/// Deezer error code for an exceeded request quota.
const QUOTA_EXCEEDED: i64 = 4;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<DeezerTrack>,
    error: Option<DeezerError>,
}

#[derive(Debug, Deserialize)]
struct DeezerTrack {
    album: Option<DeezerAlbum>,
}

#[derive(Debug, Deserialize)]
struct DeezerAlbum {
    cover_big: Option<String>,
}

/// Deezer reports failures as a 200 response with an `error` object.
#[derive(Debug, Deserialize)]
struct DeezerError {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: i64,
}

impl SearchResponse {
    fn into_cover_url(self) -> EnrichResult<Option<String>> {
        if let Some(error) = self.error {
            if error.code == QUOTA_EXCEEDED {
                return Err(EnrichError::RateLimited {
                    source_name: SOURCE_NAME.to_string(),
                });
            }
            return Err(EnrichError::Rejected {
                source_name: SOURCE_NAME.to_string(),
                message: format!("{}: {}", error.kind, error.message),
            });
        }

        Ok(self
            .data
            .into_iter()
            .next()
            .and_then(|track| track.album)
            .and_then(|album| album.cover_big)
            .filter(|url| !url.is_empty()))
    }
}

/// Deezer API client.
#[derive(Debug, Clone)]
pub struct DeezerClient {
    http: Client,
    base_url: String,
    retries: usize,
    rate_limiter: RateLimiter,
}

impl DeezerClient {
    /// Create a new Deezer client.
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

    /// Find the large album cover URL for the top track matching `artist`
    /// and `track`.
    ///
    /// Returns `Ok(None)` when nothing matches or the hit has no cover.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status, a Deezer
    /// error payload, or an unparseable body.
    pub async fn search_cover_art(&self, artist: &str, track: &str) -> EnrichResult<Option<String>> {
        let query = query::fielded(&[("artist", artist), ("track", track)], " ");
        resilience::with_retries(SOURCE_NAME, self.retries, || self.search_once(&query)).await
    }

    async fn search_once(&self, query: &str) -> EnrichResult<Option<String>> {
        self.rate_limiter.acquire().await;

        let url = format!("{}/search", self.base_url);
        log::debug!("Deezer track search: {query}");

        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::from_status(SOURCE_NAME, status));
        }

        let result: SearchResponse = response.json().await.map_err(|e| EnrichError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })?;

        result.into_cover_url()
    }
}
