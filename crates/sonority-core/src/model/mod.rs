pub mod catalog;
pub mod recommendation;
pub mod similarity;

pub use catalog::{Catalog, CatalogItem};
pub use recommendation::{EnrichedRecommendation, RecordingMetadata, Recommendation};
pub use similarity::SimilarityMatrix;
