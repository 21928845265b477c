use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use sonority_enrich::Config;

mod commands;
mod display;
mod logging;
mod tui;

#[derive(Debug, Parser)]
#[command(name = "sonority", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the catalog artifact (default: ~/.local/share/sonority/catalog.json)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Path to the similarity matrix artifact (default: ~/.local/share/sonority/similarity.json)
    #[arg(long, global = true)]
    similarity: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend songs similar to the one you name
    ///
    /// Looks the title up in the catalog and ranks every other song by its
    /// precomputed similarity score, highest first. Each recommendation is
    /// then enriched with release date, genre and MusicBrainz ID from
    /// MusicBrainz, and album cover art from Deezer.
    ///
    /// Enrichment is best effort: a failed or empty lookup shows "N/A" for
    /// that field and never stops the other recommendations from printing.
    ///
    /// Titles must match exactly, including case. Use 'sonority titles' to
    /// search the catalog.
    Recommend {
        /// Exact title of the selected song
        title: String,

        /// Disambiguate titles shared by several artists
        #[arg(long)]
        artist: Option<String>,

        /// Number of recommendations (default from config, normally 4)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Skip MusicBrainz and Deezer lookups
        #[arg(long)]
        no_enrich: bool,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the distinct titles in the catalog
    Titles {
        /// Only show titles containing this text (case-insensitive)
        filter: Option<String>,
    },
    /// Browse the catalog and view recommendations interactively
    Browse,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults if missing
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?.with_artifact_paths(cli.catalog, cli.similarity);
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Recommend {
            title,
            artist,
            count,
            no_enrich,
            json,
        } => {
            let options = commands::recommend::RecommendOptions {
                artist,
                count,
                enrich: !no_enrich,
                json,
            };
            commands::run_recommend(&config, &title, options).await?;
        }
        Commands::Titles { filter } => {
            commands::list_titles(&config, filter.as_deref())?;
        }
        Commands::Browse => {
            commands::run_browse(&config)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Example => commands::config::show_example(),
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
