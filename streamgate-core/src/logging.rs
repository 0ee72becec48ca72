//! Tracing subscriber setup
//!
//! `logging.level` applies to the StreamGate crates and the HTTP access trace;
//! everything else (hyper, reqwest, rustls) stays at `warn`. `RUST_LOG`
//! replaces the whole filter when set.

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Targets that follow the configured level
const SERVICE_TARGETS: &[&str] = &[
    "streamgate",
    "streamgate_api",
    "streamgate_core",
    "streamgate_media_providers",
    "streamgate_proxy",
    "tower_http",
];

/// Install the global subscriber: one JSON object per line (`json`) or
/// multi-line human output (`pretty`), to stdout or appended to `file_path`.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| service_filter(level));

    let (writer, ansi) = match &config.file_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stdout), true),
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.format.as_str() {
        // The resolution span carries the media key onto every provider event
        "json" => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(writer),
            )
            .try_init()?,
        _ => registry
            .with(fmt::layer().pretty().with_ansi(ansi).with_writer(writer))
            .try_init()?,
    }

    Ok(())
}

fn service_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_ascii_lowercase();
    let directives = SERVICE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::new(format!("warn,{directives}"))
}

/// Parse log level string to tracing Level
fn parse_log_level(level: &str) -> anyhow::Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(anyhow::anyhow!("Invalid log level: {level}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("INFO").unwrap(), Level::INFO);
        assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
        assert!(parse_log_level("invalid").is_err());
    }

    #[test]
    fn test_service_filter_scopes_level_to_own_crates() {
        let filter = service_filter(Level::DEBUG).to_string();
        assert!(filter.contains("streamgate_proxy=debug"));
        assert!(filter.contains("tower_http=debug"));
        assert!(!filter.contains("reqwest"));
    }

    #[test]
    fn test_init_rejects_bad_level() {
        let config = LoggingConfig {
            level: "chatty".to_string(),
            ..LoggingConfig::default()
        };
        assert!(init_logging(&config).is_err());
    }
}
