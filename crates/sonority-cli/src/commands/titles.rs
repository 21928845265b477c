use anyhow::Result;
use sonority_core::model::Catalog;
use sonority_enrich::Config;

use super::load_library;

/// Distinct catalog titles containing `filter`, ignoring case, in sorted
/// order. No filter keeps every title.
pub fn filter_titles<'a>(catalog: &'a Catalog, filter: Option<&str>) -> Vec<&'a str> {
    let needle = filter.map(str::to_lowercase).unwrap_or_default();
    catalog
        .unique_titles()
        .into_iter()
        .filter(|title| title.to_lowercase().contains(&needle))
        .collect()
}

/// Print the distinct titles in the catalog.
pub fn list_titles(config: &Config, filter: Option<&str>) -> Result<()> {
    let library = load_library(config)?;
    let titles = filter_titles(library.catalog(), filter);

    if titles.is_empty() {
        match filter {
            Some(filter) => println!("No titles match \"{filter}\"."),
            None => println!("The catalog is empty."),
        }
        return Ok(());
    }

    for title in &titles {
        println!("{title}");
    }
    log::info!("{} of {} titles shown", titles.len(), library.catalog().unique_titles().len());

    Ok(())
}
