// src/logging.rs
//! Diagnostic logging to stderr.
//!
//! Filter priority: `STYLEFIT_LOG`, then `RUST_LOG`, then the `-v` count.
//! Console progress is not logging; it goes through `reporting`.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "STYLEFIT_LOG";

/// Default level for a `-v` count.
#[must_use]
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init(verbosity: u8, color: bool) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(verbosity > 1)
        .without_time()
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(layer)
        .try_init();
}

fn build_env_filter(verbosity: u8) -> EnvFilter {
    if let Some(filter) = std::env::var(LOG_ENV)
        .ok()
        .and_then(|d| EnvFilter::try_new(d).ok())
    {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(level_for(verbosity).as_str().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::INFO);
        assert_eq!(level_for(2), Level::DEBUG);
        assert_eq!(level_for(9), Level::TRACE);
    }
}
