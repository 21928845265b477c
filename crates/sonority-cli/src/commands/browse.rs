use anyhow::{Context, Result};
use sonority_enrich::{Config, Enricher};

use super::load_library;
use crate::tui;

/// Open the interactive browser over the configured catalog.
pub fn run_browse(config: &Config) -> Result<()> {
    let library = load_library(config)?;

    if library.is_empty() {
        println!("The catalog is empty.");
        println!("Point catalog_path and similarity_path at your artifacts, or pass --catalog and --similarity.");
        return Ok(());
    }

    let enricher = Enricher::from_config(config).context("Failed to set up enrichment")?;
    tui::run_tui(&library, &enricher, config.recommendation_count)
}
