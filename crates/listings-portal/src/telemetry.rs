use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Crates whose events follow the configured portal log level.
const PORTAL_TARGETS: [&str; 2] = ["listings_portal", "listings_portal_api"];

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid portal log filter '{value}'")
            }
            TelemetryError::Subscriber(err) => write!(f, "subscriber already installed: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Expands a bare level such as `debug` into per-crate directives so that
/// portal events follow the level while dependencies stay at `warn`. Full
/// directive strings pass through untouched.
pub fn portal_directives(log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    let mut directives = vec!["warn".to_string()];
    directives.extend(PORTAL_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let directives = portal_directives(&config.log_level);
    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    })
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(config)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_levels_are_scoped_to_portal_crates() {
        assert_eq!(
            portal_directives(" debug "),
            "warn,listings_portal=debug,listings_portal_api=debug"
        );
    }

    #[test]
    fn explicit_directives_pass_through() {
        assert_eq!(
            portal_directives("info,listings_portal=trace"),
            "info,listings_portal=trace"
        );
    }

    #[test]
    fn invalid_levels_report_the_configured_value() {
        let config = TelemetryConfig {
            log_level: "listings_portal=loud".to_string(),
        };
        match build_filter(&config) {
            Err(TelemetryError::EnvFilter { value, .. }) => {
                assert_eq!(value, "listings_portal=loud")
            }
            other => panic!("expected filter error, got {:?}", other.map(|_| ())),
        }
    }
}
