//! Log setup for the drop server
//!
//! One global `tracing` subscriber, compact format. The filter is built from
//! `LOG_LEVEL` (see [`ServerConfig`](crate::config::ServerConfig)) unless
//! `RUST_LOG` is set, in which case `RUST_LOG` wins outright. `sqlx` logs every
//! statement at info, so it is pinned to warn regardless of the base level.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}'")]
pub struct UnknownLogLevel(String);

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(UnknownLogLevel(raw.to_string())),
        }
    }
}

/// Filter and format settings for [`init_tracing`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    pub level: LogLevel,
    /// Per-target levels appended after the base level
    pub overrides: Vec<(String, LogLevel)>,
    pub show_targets: bool,
    pub show_thread_ids: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_level(LogLevel::Info)
    }
}

impl TracingConfig {
    /// Base level for this crate, with noisy dependencies held at warn
    pub fn for_level(level: LogLevel) -> Self {
        Self {
            level,
            overrides: vec![("sqlx".to_string(), LogLevel::Warn), ("heed".to_string(), LogLevel::Warn)],
            show_targets: true,
            show_thread_ids: false,
        }
    }

    /// Log every catalog miss and reset in `drops` at debug
    pub fn verbose_drops(mut self) -> Self {
        self.overrides
            .push(("tower_drop_server::drops".to_string(), LogLevel::Debug));
        self
    }

    /// `EnvFilter` directive string, e.g. `info,sqlx=warn`
    pub fn directives(&self) -> String {
        std::iter::once(self.level.to_string())
            .chain(
                self.overrides
                    .iter()
                    .map(|(target, level)| format!("{}={}", target, level)),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

static TRACING_INIT: Once = Once::new();

pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Install the global subscriber; only the first call has any effect
pub fn init_tracing(config: &TracingConfig) {
    let directives = config.directives();
    let show_targets = config.show_targets;
    let show_thread_ids = config.show_thread_ids;

    TRACING_INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives));

        // a test harness may already own the global subscriber
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(show_targets)
            .with_thread_ids(show_thread_ids)
            .compact()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!(" warning ".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_directives_pin_sqlx() {
        let config = TracingConfig::for_level(LogLevel::Trace);
        assert_eq!(config.directives(), "trace,sqlx=warn,heed=warn");
    }

    #[test]
    fn test_verbose_drops_override() {
        let directives = TracingConfig::default().verbose_drops().directives();
        assert!(directives.starts_with("info,"));
        assert!(directives.ends_with("tower_drop_server::drops=debug"));
    }

    #[test]
    fn test_init_tracing_idempotent() {
        init_tracing_default();
        init_tracing(&TracingConfig::for_level(LogLevel::Debug));
        tracing::debug!("subscriber already installed");
    }
}
