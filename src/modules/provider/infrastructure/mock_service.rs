//! Simulated upstream service
//!
//! Stands in for a real profile or order backend. Latency is raced against
//! the caller's scope, so a cancelled fetch stops its timer instead of
//! leaving it running.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::modules::provider::{FetchSource, Fetchable, UserId};
use crate::shared::errors::{FetchError, FetchResult};
use crate::shared::scope::Scope;

/// Latency used when none is configured
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct MockService {
    kind: FetchSource,
    response: String,
    delay: Duration,
    error: Option<String>,
}

impl MockService {
    pub fn new(kind: FetchSource, response: impl Into<String>) -> Self {
        Self {
            kind,
            response: response.into(),
            delay: DEFAULT_LATENCY,
            error: None,
        }
    }

    /// Profile source answering "User: Alice"
    pub fn profile() -> Self {
        Self::new(FetchSource::Profile, "User: Alice")
    }

    /// Order source answering "Order: 5"
    pub fn order() -> Self {
        Self::new(FetchSource::Order, "Order: 5")
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail every fetch with `message`. An empty message leaves the service healthy.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.error = (!message.is_empty()).then_some(message);
        self
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    pub fn kind(&self) -> FetchSource {
        self.kind
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Fetchable for MockService {
    async fn fetch(&self, scope: &Scope, id: UserId) -> FetchResult<String> {
        // Injected failures are reported before any simulated latency
        if let Some(message) = &self.error {
            debug!(user_id = %id, source = %self.kind, "Mock service reporting injected failure");
            return Err(FetchError::Upstream {
                provider: self.kind,
                message: message.clone(),
            });
        }

        tokio::select! {
            _ = sleep(self.delay) => Ok(self.response.clone()),
            _ = scope.done() => {
                let error = scope.error();
                debug!(user_id = %id, source = %self.kind, %error, "Mock service gave up");
                Err(error)
            }
        }
    }
}
