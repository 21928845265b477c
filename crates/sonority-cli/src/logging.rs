use anyhow::{anyhow, bail, Result};
use sonority_enrich::config::LoggingConfig;
use twyg::{LogLevel, OptsBuilder, Output};

/// Level names from least to most verbose.
const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Install the process-wide logger.
///
/// Each `-v` raises verbosity one step above the configured level. Logs go
/// to stderr so they never interleave with command output or the TUI.
pub fn init(config: &LoggingConfig, verbose: u8) -> Result<()> {
    let level = effective_level(&config.level, verbose)?;

    let opts = OptsBuilder::new()
        .coloured(config.coloured)
        .output(Output::Stderr)
        .level(to_twyg(level))
        .report_caller(config.report_caller)
        .build()
        .map_err(|e| anyhow!("Invalid logging options: {e}"))?;

    twyg::setup(opts).map_err(|e| anyhow!("Could not set up logger: {e}"))?;
    Ok(())
}

/// Resolve the configured level name plus `verbose` steps.
fn effective_level(configured: &str, verbose: u8) -> Result<&'static str> {
    let configured = configured.to_ascii_lowercase();
    let configured = if configured == "warning" {
        "warn"
    } else {
        configured.as_str()
    };
    let Some(base) = LEVELS.iter().position(|level| *level == configured) else {
        bail!(
            "Unknown log level: {configured}\n\nValid levels: {}",
            LEVELS.join(", ")
        );
    };
    Ok(LEVELS[(base + usize::from(verbose)).min(LEVELS.len() - 1)])
}

fn to_twyg(level: &str) -> LogLevel {
    match level {
        "error" => LogLevel::Error,
        "info" => LogLevel::Info,
        "debug" => LogLevel::Debug,
        "trace" => LogLevel::Trace,
        _ => LogLevel::Warn,
    }
}
