use crate::config::TelemetryConfig;
use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::EnvFilter;

/// Query logging from sqlx is noisy at `info`; keep it at `warn` unless RUST_LOG says otherwise.
const QUIET_DEPENDENCIES: &[&str] = &["sqlx=warn"];

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter { value: String, source: ParseError },
    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(config)?)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let invalid = |source| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    };

    let mut filter = EnvFilter::try_new(&config.log_level).map_err(invalid)?;
    for directive in QUIET_DEPENDENCIES {
        let directive: Directive = directive.parse().map_err(invalid)?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}
