//! Core domain model for sonority.
//!
//! This crate defines the song catalog, the precomputed similarity matrix,
//! artifact loading, and the recommendation engine that ranks catalog items
//! by similarity. It performs no network I/O.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod artifact;
pub mod error;
pub mod library;
pub mod model;
pub mod recommend;

pub use error::{Error, Result};
pub use library::Library;
pub use recommend::{Recommender, DEFAULT_RECOMMENDATION_COUNT};
