//! Tracing subscriber setup
//!
//! The library only emits `tracing` events. Binaries and tests that want to
//! see them call [`init_subscriber`] once at startup.
//!
//! ```rust,no_run
//! use studyai::telemetry::{SubscriberConfig, init_subscriber};
//!
//! init_subscriber(SubscriberConfig::new().level("studyai=debug").json(true))?;
//! # Ok::<(), studyai::StudyError>(())
//! ```

use tracing_subscriber::EnvFilter;

use crate::error::StudyError;

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub default_directive: String,
    pub format: LogFormat,
    /// Print the event target
    pub with_target: bool,
    pub ansi: bool,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".to_string(),
            format: LogFormat::Text,
            with_target: true,
            ansi: true,
        }
    }
}

impl SubscriberConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter directive (e.g. `debug` or `studyai=trace,reqwest=warn`)
    pub fn level<S: Into<String>>(mut self, directive: S) -> Self {
        self.default_directive = directive.into();
        self
    }

    pub fn json(mut self, enabled: bool) -> Self {
        self.format = if enabled { LogFormat::Json } else { LogFormat::Text };
        self
    }

    pub const fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    pub const fn ansi(mut self, enabled: bool) -> Self {
        self.ansi = enabled;
        self
    }

    /// `RUST_LOG` when set, otherwise the configured directive.
    pub fn env_filter(&self) -> Result<EnvFilter, StudyError> {
        match std::env::var(EnvFilter::DEFAULT_ENV) {
            Ok(from_env) if !from_env.trim().is_empty() => EnvFilter::try_new(from_env),
            _ => EnvFilter::try_new(&self.default_directive),
        }
        .map_err(|e| StudyError::InvalidInput(format!("Invalid log filter: {e}")))
    }
}

/// Install a global fmt subscriber.
///
/// Fails with `InvalidInput` when the filter does not parse or a global
/// subscriber is already set.
pub fn init_subscriber(config: SubscriberConfig) -> Result<(), StudyError> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let result = match config.format {
        LogFormat::Text => builder.with_ansi(config.ansi).try_init(),
        LogFormat::Json => builder.json().with_ansi(false).try_init(),
    };
    result.map_err(|e| StudyError::InvalidInput(format!("Failed to install subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = SubscriberConfig::new().level("debug").json(true).ansi(false);
        assert_eq!(config.default_directive, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.ansi);
    }

    #[test]
    fn bad_directive_is_rejected() {
        if std::env::var(EnvFilter::DEFAULT_ENV).is_ok() {
            return;
        }
        let err = SubscriberConfig::new().level("studyai=notalevel").env_filter().unwrap_err();
        assert!(matches!(err, StudyError::InvalidInput(_)));
    }
}
