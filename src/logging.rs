//! Log initialisation
//!
//! Logs go to stderr so stdout stays free for the prompt and the field echo
//! that operators read. `RUST_LOG` sets the filter (default `info`) and
//! `RELEASE_STAMP_LOG_FORMAT=json` switches to JSON lines.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log format
pub const LOG_FORMAT_ENV: &str = "RELEASE_STAMP_LOG_FORMAT";

static TRACING: OnceLock<()> = OnceLock::new();

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// Parse the value of [`LOG_FORMAT_ENV`]; anything but `json` is compact
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Initialise tracing once, safe to call multiple times
pub fn init_tracing_once() {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let format = LogFormat::from_env_value(std::env::var(LOG_FORMAT_ENV).ok().as_deref());

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false);
        let _ = match format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Compact => builder.compact().try_init(),
        };
        tracing::debug!(?format, "tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_env_value() {
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Compact);
        assert_eq!(LogFormat::from_env_value(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("pretty")), LogFormat::Compact);
    }

    #[test]
    fn test_init_is_idempotent() {
        init_tracing_once();
        init_tracing_once();
    }
}
