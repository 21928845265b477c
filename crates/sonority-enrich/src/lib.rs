//! Best-effort enrichment of recommendations for sonority.
//!
//! Looks up recording metadata on MusicBrainz and cover art on Deezer for
//! each recommended (artist, title) pair. Lookups never fail the overall
//! response: any error degrades to an absent field.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod deezer;
pub mod enricher;
pub mod error;
pub mod musicbrainz;
mod query;
pub mod resilience;

pub use config::Config;
pub use deezer::DeezerClient;
pub use enricher::{CoverArtLookup, Enricher, RecordingLookup};
pub use error::{EnrichError, EnrichResult};
pub use musicbrainz::MusicBrainzClient;
