pub mod browse;
pub mod config;
pub mod recommend;
pub mod titles;

use anyhow::{Context, Result};
use sonority_core::Library;
use sonority_enrich::Config;

pub use browse::run_browse;
pub use recommend::run_recommend;
pub use titles::list_titles;

/// Load the catalog and similarity artifacts named by `config`.
pub fn load_library(config: &Config) -> Result<Library> {
    Library::load(&config.catalog_path, &config.similarity_path).with_context(|| {
        format!(
            "Failed to load artifacts (catalog: {}, similarity: {})\n\n\
             Set catalog_path and similarity_path in the config file, or pass \
             --catalog and --similarity.",
            config.catalog_path.display(),
            config.similarity_path.display()
        )
    })
}
