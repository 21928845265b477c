use anyhow::{Context, Result};
use sonority_enrich::{config, Config};

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    let path = config::config_file_path();
    println!("Config file: {}", path.display());
    let exists = path.exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{rendered}");

    println!("Priority: CLI args > ENV vars (SONO_*) > Config file > Defaults");

    Ok(())
}

/// Show the config file path.
pub fn show_path() {
    println!("{}", config::config_file_path().display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let path = config::config_file_path();

    if created {
        println!("\u{2713} Created config file: {}", path.display());
        println!("\nEdit this file to point sonority at your catalog and similarity artifacts.");
    } else {
        println!("Config file already exists: {}", path.display());
    }

    Ok(())
}
