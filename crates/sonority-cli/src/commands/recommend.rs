use anyhow::{bail, Context, Result};
use sonority_core::model::Recommendation;
use sonority_core::{Library, Recommender};
use sonority_enrich::{Config, Enricher};

use super::load_library;
use super::titles::filter_titles;
use crate::display;

/// Most near-miss titles offered when a lookup fails.
const MAX_SUGGESTIONS: usize = 5;

/// Flags for `sonority recommend` that override the config.
#[derive(Debug, Clone, Default)]
pub struct RecommendOptions {
    pub artist: Option<String>,
    pub count: Option<usize>,
    pub enrich: bool,
    pub json: bool,
}

/// Print the top recommendations for `title`, enriched with metadata and
/// cover art unless disabled.
pub async fn run_recommend(config: &Config, title: &str, options: RecommendOptions) -> Result<()> {
    let library = load_library(config)?;
    let count = options.count.unwrap_or(config.recommendation_count);

    let recommendations = rank(&library, title, options.artist.as_deref(), count)?;

    let enricher = if options.enrich {
        Enricher::from_config(config).context("Failed to set up enrichment")?
    } else {
        Enricher::disabled()
    };
    log::info!(
        "Enriching {} recommendations (sources: {:?})",
        recommendations.len(),
        enricher.enabled_sources()
    );
    let enriched = enricher.enrich_all(recommendations).await;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&enriched)?);
    } else {
        println!("{}", display::render_text(title, &enriched));
    }

    Ok(())
}

/// Rank the library against the selected song, turning an unknown title
/// into a readable error with near-miss suggestions.
fn rank(
    library: &Library,
    title: &str,
    artist: Option<&str>,
    count: usize,
) -> Result<Vec<Recommendation>> {
    let recommender = Recommender::new(library).with_limit(count);
    log::debug!("Ranking top {} matches for {title}", recommender.limit());
    let result = match artist {
        Some(artist) => recommender.recommend_for(title, artist),
        None => recommender.recommend(title),
    };

    match result {
        Ok(recommendations) => Ok(recommendations),
        Err(e) if e.is_not_found() => bail!("{}", not_found_message(library, title, artist)),
        Err(e) => Err(e.into()),
    }
}

fn not_found_message(library: &Library, title: &str, artist: Option<&str>) -> String {
    let mut message = match artist {
        Some(artist) => format!("No song titled \"{title}\" by {artist} in the catalog."),
        None => format!("No song titled \"{title}\" in the catalog."),
    };

    let suggestions = filter_titles(library.catalog(), Some(title));
    if suggestions.is_empty() {
        message.push_str("\n\nTitles must match exactly. Run 'sonority titles' to search.");
    } else {
        message.push_str("\n\nDid you mean:");
        for suggestion in suggestions.iter().take(MAX_SUGGESTIONS) {
            message.push_str("\n  ");
            message.push_str(suggestion);
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonority_core::model::{Catalog, CatalogItem, SimilarityMatrix};

    fn library() -> Library {
        let catalog: Catalog = [
            ("Yesterday", "The Beatles"),
            ("Yesterday Once More", "Carpenters"),
            ("Yesterday", "Boyz II Men"),
        ]
        .into_iter()
        .map(|(title, artist)| CatalogItem::new(title, artist))
        .collect();
        let similarity = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.4, 0.7],
            vec![0.4, 1.0, 0.2],
            vec![0.7, 0.2, 1.0],
        ])
        .unwrap();
        Library::new(catalog, similarity).unwrap()
    }

    #[test]
    fn test_rank_by_title() {
        let recommendations = rank(&library(), "Yesterday", None, 4).unwrap();
        let indices: Vec<_> = recommendations.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![2, 1]);
    }

    #[test]
    fn test_rank_with_artist_picks_that_row() {
        let recommendations = rank(&library(), "Yesterday", Some("Boyz II Men"), 1).unwrap();
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].artist, "The Beatles");
    }

    #[test]
    fn test_unknown_title_suggests_near_misses() {
        let err = rank(&library(), "yesterday", None, 4).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("No song titled \"yesterday\""));
        assert!(message.contains("Did you mean:"));
        assert!(message.contains("Yesterday Once More"));
    }

    #[test]
    fn test_unknown_title_without_suggestions() {
        let err = rank(&library(), "Hey Jude", None, 4).unwrap_err();
        assert!(err.to_string().contains("sonority titles"));
    }
}
