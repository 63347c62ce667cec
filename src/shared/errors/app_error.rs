use serde::Serialize;
use thiserror::Error;

use crate::modules::provider::FetchSource;

/// Failure reported by a single upstream fetch
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "detail")]
pub enum FetchError {
    #[error("{provider} upstream error: {message}")]
    Upstream {
        provider: FetchSource,
        message: String,
    },

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("fetch cancelled")]
    Cancelled,

    #[error("{provider} fetch panicked")]
    Panicked { provider: FetchSource },
}

/// Failure of a whole aggregate call
///
/// Every variant renders with the same `aggregation failed` prefix, so callers
/// that only log the error see one failure shape. Callers that need to tell a
/// timeout from an upstream fault can match on the variant.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AggregationError {
    #[error("aggregation failed: deadline exceeded")]
    DeadlineExceeded,

    #[error("aggregation failed: {provider} upstream error: {message}")]
    Upstream {
        provider: FetchSource,
        message: String,
    },

    #[error("aggregation failed: cancelled")]
    Cancelled,

    #[error("aggregation failed: {provider} fetch panicked")]
    Panicked { provider: FetchSource },
}

impl AggregationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, AggregationError::DeadlineExceeded)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AggregationError::Cancelled)
    }

    /// Source that reported the failure, if it came from a specific upstream
    pub fn provider(&self) -> Option<FetchSource> {
        match self {
            AggregationError::Upstream { provider, .. }
            | AggregationError::Panicked { provider } => Some(*provider),
            AggregationError::DeadlineExceeded | AggregationError::Cancelled => None,
        }
    }
}

impl From<FetchError> for AggregationError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Upstream { provider, message } => {
                AggregationError::Upstream { provider, message }
            }
            FetchError::DeadlineExceeded => AggregationError::DeadlineExceeded,
            FetchError::Cancelled => AggregationError::Cancelled,
            FetchError::Panicked { provider } => AggregationError::Panicked { provider },
        }
    }
}

/// Invalid settings found while loading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid duration for {key}: {value:?} ({reason})")]
    InvalidDuration {
        key: String,
        value: String,
        reason: String,
    },
}

// Result type aliases for convenience
pub type FetchResult<T> = Result<T, FetchError>;
pub type AggregationResult<T> = Result<T, AggregationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_carries_aggregation_context() {
        let errors = [
            AggregationError::DeadlineExceeded,
            AggregationError::Cancelled,
            AggregationError::Upstream {
                provider: FetchSource::Profile,
                message: "profile failed".to_string(),
            },
            AggregationError::Panicked {
                provider: FetchSource::Order,
            },
        ];

        for error in errors {
            assert!(
                error.to_string().starts_with("aggregation failed"),
                "missing context in {:?}",
                error
            );
        }
    }

    #[test]
    fn test_fetch_error_conversion_keeps_kind() {
        let upstream = AggregationError::from(FetchError::Upstream {
            provider: FetchSource::Order,
            message: "order failed".to_string(),
        });
        assert_eq!(upstream.provider(), Some(FetchSource::Order));
        assert_eq!(
            upstream.to_string(),
            "aggregation failed: order upstream error: order failed"
        );

        assert!(AggregationError::from(FetchError::DeadlineExceeded).is_timeout());
        assert!(AggregationError::from(FetchError::Cancelled).is_cancelled());
        assert_eq!(AggregationError::from(FetchError::Cancelled).provider(), None);
    }

    #[test]
    fn test_aggregation_error_serializes_tagged() {
        let json = serde_json::to_value(AggregationError::Upstream {
            provider: FetchSource::Profile,
            message: "boom".to_string(),
        })
        .unwrap();

        assert_eq!(json["type"], "Upstream");
        assert_eq!(json["message"]["provider"], "profile");
        assert_eq!(json["message"]["message"], "boom");

        let json = serde_json::to_value(AggregationError::DeadlineExceeded).unwrap();
        assert_eq!(json["type"], "DeadlineExceeded");
    }
}
