//! Tracing subscriber initialization.
//!
//! Services call [`init_tracing`] once at startup. `RUST_LOG` takes
//! precedence over the configured level when it is set.

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Failure to install the global subscriber.
#[derive(Error, Debug)]
pub enum TracingInitError {
    /// The configured level is not a valid filter directive
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The rejected filter string
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber was already installed
    #[error("Tracing already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Service name attached to the startup event
    pub service_name: String,
    /// Log level filter
    pub log_level: String,
    /// Whether to output JSON format
    pub json_output: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "rust-service".to_string(),
            log_level: "info".to_string(),
            json_output: false,
        }
    }
}

impl TracingConfig {
    /// Create config with custom service name.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Create config with custom log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Toggle JSON output.
    #[must_use]
    pub const fn with_json_output(mut self, enabled: bool) -> Self {
        self.json_output = enabled;
        self
    }

    /// Resolve the effective filter: `RUST_LOG` if set, else the configured level.
    ///
    /// # Errors
    ///
    /// Returns [`TracingInitError::InvalidFilter`] if the configured level
    /// cannot be parsed.
    pub fn env_filter(&self) -> Result<EnvFilter, TracingInitError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.log_level).map_err(|e| TracingInitError::InvalidFilter {
            filter: self.log_level.clone(),
            reason: e.to_string(),
        })
    }
}

/// Initialize tracing with the given configuration.
///
/// Sets up the global subscriber. Should be called once at application startup.
///
/// # Errors
///
/// Fails if the filter is invalid or a global subscriber already exists.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingInitError> {
    let filter = config.env_filter()?;

    let result = if config.json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };
    result.map_err(|e| TracingInitError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(service = %config.service_name, level = %config.log_level, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.service_name, "rust-service");
        assert_eq!(config.log_level, "info");
        assert!(!config.json_output);
    }

    #[test]
    fn test_config_builder() {
        let config = TracingConfig::default()
            .with_service_name("token-issuer")
            .with_log_level("debug")
            .with_json_output(true);

        assert_eq!(config.service_name, "token-issuer");
        assert_eq!(config.log_level, "debug");
        assert!(config.json_output);
    }

    #[test]
    fn test_second_init_is_rejected() {
        let config = TracingConfig::default().with_log_level("warn");
        let first = init_tracing(&config);
        let second = init_tracing(&config);

        // Another test binary thread may have won the race for the first call.
        assert!(first.is_ok() || matches!(first, Err(TracingInitError::AlreadyInitialized(_))));
        assert!(matches!(second, Err(TracingInitError::AlreadyInitialized(_))));
    }
}
