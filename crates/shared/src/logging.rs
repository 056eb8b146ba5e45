use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Output format of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `identity=trace`
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG` and `LOG_FORMAT`, falling back to defaults.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let defaults = Self::default();
        let filter = crate::env::optional_var("RUST_LOG").unwrap_or(defaults.filter);
        let format = match crate::env::optional_var("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => defaults.format,
        };
        Ok(Self { filter, format })
    }
}

pub fn configure_logging() -> Result<(), anyhow::Error> {
    configure_logging_with(&LoggingConfig::from_env()?)
}

/// Install the global subscriber. A second call only logs a warning.
pub fn configure_logging_with(config: &LoggingConfig) -> Result<(), anyhow::Error> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_str(&config.filter)?)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stdout);

    let installed = match config.format {
        LogFormat::Json => subscriber.json().try_init(),
        LogFormat::Text => subscriber.try_init(),
    };

    if let Err(e) = installed {
        warn!("Logging already initialized, keeping the existing subscriber: {e}");
    }

    Ok(())
}

#[cfg(all(test, feature = "unit_test"))]
mod unit_test {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_configure_logging_twice_is_ok() {
        let config = LoggingConfig::default();
        assert!(configure_logging_with(&config).is_ok());
        assert!(configure_logging_with(&config).is_ok());
    }
}
