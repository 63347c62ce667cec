use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::modules::dashboard::diagnostics::{DiagnosticSink, NoopSink};
use crate::shared::errors::ConfigError;

/// Overall deadline applied to each aggregate call unless configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Environment variable overriding the aggregate timeout, in milliseconds
pub const TIMEOUT_ENV: &str = "DASHBOARD_TIMEOUT_MS";

/// Settings fixed when an aggregator is built
#[derive(Clone)]
pub struct AggregatorConfig {
    /// Deadline for each aggregate call, measured from its start
    pub timeout: Duration,
    /// Receives a record for every failed call
    pub diagnostics: Arc<dyn DiagnosticSink>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            diagnostics: Arc::new(NoopSink),
        }
    }
}

impl fmt::Debug for AggregatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatorConfig")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AggregatorConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`; keys that are absent keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            config.timeout = parse_duration_ms(TIMEOUT_ENV, &raw)?;
        }

        Ok(config)
    }
}

/// Parse a positive millisecond count
pub fn parse_duration_ms(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidDuration {
        key: key.to_string(),
        value: raw.to_string(),
        reason,
    };

    let millis: u64 = raw.trim().parse().map_err(|e| invalid(format!("{}", e)))?;
    if millis == 0 {
        return Err(invalid("must be greater than zero".to_string()));
    }

    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AggregatorConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_builder_overrides_timeout() {
        let config = AggregatorConfig::default().with_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_from_lookup_without_variables_keeps_defaults() {
        let config = AggregatorConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_lookup_reads_timeout() {
        let vars = HashMap::from([(TIMEOUT_ENV, "150")]);
        let config =
            AggregatorConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.timeout, Duration::from_millis(150));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let err = parse_duration_ms(TIMEOUT_ENV, "soon").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDuration { ref key, ref value, .. }
                if key == TIMEOUT_ENV && value == "soon"
        ));

        assert!(parse_duration_ms(TIMEOUT_ENV, "0").is_err());
        assert_eq!(
            parse_duration_ms(TIMEOUT_ENV, " 75 ").unwrap(),
            Duration::from_millis(75)
        );
    }

    #[test]
    fn test_debug_output_hides_sink() {
        let rendered = format!("{:?}", AggregatorConfig::default());
        assert!(rendered.contains("timeout"));
        assert!(!rendered.contains("diagnostics"));
    }
}
