//! Fan-out enrichment of recommendations.
//!
//! Each recommendation is enriched in its own task, and within a task the
//! recording and cover-art lookups run concurrently. Lookup failures are
//! logged and reported as absent fields; a failure for one recommendation
//! never affects another.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use sonority_core::model::{EnrichedRecommendation, RecordingMetadata, Recommendation};

use crate::config::Config;
use crate::deezer::DeezerClient;
use crate::error::EnrichResult;
use crate::musicbrainz::MusicBrainzClient;

/// A source of recording metadata for (artist, title) pairs.
#[async_trait]
pub trait RecordingLookup: fmt::Debug + Send + Sync {
    /// Short name used in log messages.
    fn source_name(&self) -> &'static str;

    async fn find_recording(
        &self,
        artist: &str,
        title: &str,
    ) -> EnrichResult<Option<RecordingMetadata>>;
}

/// A source of cover-art URLs for (artist, track) pairs.
#[async_trait]
pub trait CoverArtLookup: fmt::Debug + Send + Sync {
    /// Short name used in log messages.
    fn source_name(&self) -> &'static str;

    async fn find_cover_art(&self, artist: &str, track: &str) -> EnrichResult<Option<String>>;
}

#[async_trait]
impl RecordingLookup for MusicBrainzClient {
    fn source_name(&self) -> &'static str {
        "musicbrainz"
    }

    async fn find_recording(
        &self,
        artist: &str,
        title: &str,
    ) -> EnrichResult<Option<RecordingMetadata>> {
        self.search_recording(artist, title).await
    }
}

#[async_trait]
impl CoverArtLookup for DeezerClient {
    fn source_name(&self) -> &'static str {
        "deezer"
    }

    async fn find_cover_art(&self, artist: &str, track: &str) -> EnrichResult<Option<String>> {
        self.search_cover_art(artist, track).await
    }
}

/// Best-effort enrichment over optional metadata and cover-art sources.
///
/// A missing source behaves like a lookup that never finds anything.
#[derive(Debug, Clone, Default)]
pub struct Enricher {
    recordings: Option<Arc<dyn RecordingLookup>>,
    cover_art: Option<Arc<dyn CoverArtLookup>>,
}

impl Enricher {
    /// An enricher with no sources; every field stays absent.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_recordings(mut self, source: Arc<dyn RecordingLookup>) -> Self {
        self.recordings = Some(source);
        self
    }

    #[must_use]
    pub fn with_cover_art(mut self, source: Arc<dyn CoverArtLookup>) -> Self {
        self.cover_art = Some(source);
        self
    }

    /// Create an enricher backed by MusicBrainz and Deezer.
    ///
    /// Returns a disabled enricher when `config.enrich` is false.
    ///
    /// # Errors
    /// Returns an error if an HTTP client cannot be created.
    pub fn from_config(config: &Config) -> EnrichResult<Self> {
        if !config.enrich {
            return Ok(Self::disabled());
        }
        let musicbrainz = MusicBrainzClient::new(&config.musicbrainz_settings())?;
        let deezer = DeezerClient::new(&config.deezer_settings())?;
        Ok(Self::disabled()
            .with_recordings(Arc::new(musicbrainz))
            .with_cover_art(Arc::new(deezer)))
    }

    /// List which enrichment sources are enabled.
    #[must_use]
    pub fn enabled_sources(&self) -> Vec<&'static str> {
        let mut sources = Vec::new();
        if let Some(source) = &self.recordings {
            sources.push(source.source_name());
        }
        if let Some(source) = &self.cover_art {
            sources.push(source.source_name());
        }
        sources
    }

    /// Look up recording metadata, reporting any failure as `None`.
    pub async fn lookup_recording(&self, artist: &str, title: &str) -> Option<RecordingMetadata> {
        let source = self.recordings.as_ref()?;
        match source.find_recording(artist, title).await {
            Ok(Some(metadata)) => Some(metadata),
            Ok(None) => {
                log::debug!("No {} recording for {artist} - {title}", source.source_name());
                None
            }
            Err(e) => {
                log::warn!(
                    "{} lookup failed for {artist} - {title}: {e}",
                    source.source_name()
                );
                None
            }
        }
    }

    /// Look up a cover-art URL, reporting any failure as `None`.
    pub async fn lookup_cover_art(&self, artist: &str, track: &str) -> Option<String> {
        let source = self.cover_art.as_ref()?;
        match source.find_cover_art(artist, track).await {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                log::debug!("No {} cover art for {artist} - {track}", source.source_name());
                None
            }
            Err(e) => {
                log::warn!(
                    "{} cover-art lookup failed for {artist} - {track}: {e}",
                    source.source_name()
                );
                None
            }
        }
    }

    /// Enrich one recommendation. Never fails.
    pub async fn enrich(&self, recommendation: Recommendation) -> EnrichedRecommendation {
        let (metadata, cover_art) = tokio::join!(
            self.lookup_recording(&recommendation.artist, &recommendation.title),
            self.lookup_cover_art(&recommendation.artist, &recommendation.title),
        );
        EnrichedRecommendation::bare(recommendation)
            .with_metadata(metadata)
            .with_cover_art(cover_art)
    }

    /// Enrich all recommendations concurrently, preserving their order.
    ///
    /// A task that dies leaves its recommendation un-enriched.
    pub async fn enrich_all(
        &self,
        recommendations: Vec<Recommendation>,
    ) -> Vec<EnrichedRecommendation> {
        let tasks: Vec<_> = recommendations
            .into_iter()
            .map(|recommendation| {
                let enricher = self.clone();
                let fallback = recommendation.clone();
                let handle = tokio::spawn(async move { enricher.enrich(recommendation).await });
                (fallback, handle)
            })
            .collect();

        let mut enriched = Vec::with_capacity(tasks.len());
        for (fallback, handle) in tasks {
            match handle.await {
                Ok(result) => enriched.push(result),
                Err(e) => {
                    log::warn!(
                        "Enrichment task for {} - {} failed: {e}",
                        fallback.artist,
                        fallback.title
                    );
                    enriched.push(EnrichedRecommendation::bare(fallback));
                }
            }
        }
        enriched
    }
}
