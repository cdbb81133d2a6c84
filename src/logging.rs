//! Tracing subscriber setup for hosts that do not install their own.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::error::LoggingError;

/// Install a global subscriber writing to stdout.
///
/// `RUST_LOG` takes precedence over `default_filter` when it is set and
/// valid. A subscriber that is already installed is left in place.
pub fn init(default_filter: &str) -> Result<(), LoggingError> {
    let configured =
        EnvFilter::try_new(default_filter).map_err(|e| LoggingError::InvalidFilter {
            filter: default_filter.to_string(),
            reason: e.to_string(),
        })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or(configured);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialised)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_rejected() {
        assert!(matches!(
            init("schemkit=notalevel"),
            Err(LoggingError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        let _ = init("info");
        assert!(matches!(init("info"), Err(LoggingError::AlreadyInitialised)));
    }
}
