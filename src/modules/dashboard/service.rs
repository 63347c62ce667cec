use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, debug_span, info, warn, Instrument};
use uuid::Uuid;

use crate::modules::dashboard::{config::AggregatorConfig, diagnostics::DiagnosticEvent};
use crate::modules::provider::{FetchSource, Fetchable, UserId};
use crate::shared::errors::{AggregationError, AggregationResult, FetchError, FetchResult};
use crate::shared::scope::Scope;
use crate::shared::utils::TimedOperation;

/// Service for aggregating user data from the profile and order sources
///
/// Both sources are queried concurrently under one deadline. The first
/// failure cancels the sibling fetch, and the call still waits for both
/// fetches to settle before it returns.
#[derive(Clone)]
pub struct Aggregator {
    profiles: Arc<dyn Fetchable>,
    orders: Arc<dyn Fetchable>,
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(
        profiles: Arc<dyn Fetchable>,
        orders: Arc<dyn Fetchable>,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            profiles,
            orders,
            config,
        }
    }

    /// Fetch profile and order data for `id` and join them as `profile | order`
    ///
    /// `parent` bounds the call from outside: cancelling it, or letting its
    /// deadline pass, fails the call just like the configured timeout does.
    pub async fn aggregate(&self, parent: &Scope, id: UserId) -> AggregationResult<String> {
        let call_id = Uuid::new_v4();
        let timer = TimedOperation::new("aggregate");

        let outcome = self
            .join_sources(parent, id)
            .instrument(debug_span!("aggregate", %call_id, user_id = %id))
            .await;

        let elapsed_ms = timer.finish().as_millis() as u64;

        match &outcome {
            Ok(_) => info!(%call_id, user_id = %id, elapsed_ms, "Aggregated user data"),
            Err(error) => {
                warn!(%call_id, user_id = %id, elapsed_ms, %error, "Failed to aggregate user data");
                self.config.diagnostics.record(&DiagnosticEvent {
                    call_id,
                    user_id: id,
                    elapsed_ms,
                    error: error.clone(),
                });
            }
        }

        outcome
    }

    async fn join_sources(&self, parent: &Scope, id: UserId) -> AggregationResult<String> {
        let scope = parent.child_with_timeout(self.config.timeout);
        // Cancels the derived scope on every exit path, including unwinding
        let _release = scope.drop_guard();

        let mut tasks = JoinSet::new();
        for source in FetchSource::ALL {
            let fetcher = Arc::clone(self.fetcher(source));
            let scope = scope.clone();
            tasks.spawn(fetch_from(source, fetcher, scope, id).in_current_span());
        }

        let mut profile = None;
        let mut order = None;
        let mut first_error: Option<AggregationError> = None;

        while let Some(joined) = tasks.join_next().await {
            let (source, result) = match joined {
                Ok(settled) => settled,
                Err(join_error) => {
                    // Panics are caught inside the task, so only an aborted task lands here
                    warn!(error = %join_error, "Fetch task did not complete");
                    first_error.get_or_insert(AggregationError::Cancelled);
                    scope.cancel();
                    continue;
                }
            };

            match result {
                Ok(payload) => match source {
                    FetchSource::Profile => profile = Some(payload),
                    FetchSource::Order => order = Some(payload),
                },
                Err(error) => {
                    if first_error.is_none() {
                        debug!(%source, %error, "First failure observed, cancelling sibling fetch");
                        scope.cancel();
                        first_error = Some(error.into());
                    }
                }
            }
        }

        if let Some(error) = first_error {
            return Err(error);
        }

        match (profile, order) {
            (Some(profile), Some(order)) => Ok(format!("{} | {}", profile, order)),
            _ => Err(AggregationError::Cancelled),
        }
    }

    fn fetcher(&self, source: FetchSource) -> &Arc<dyn Fetchable> {
        match source {
            FetchSource::Profile => &self.profiles,
            FetchSource::Order => &self.orders,
        }
    }
}

/// Run one fetch to completion, turning a panic into a reported failure
async fn fetch_from(
    source: FetchSource,
    fetcher: Arc<dyn Fetchable>,
    scope: Scope,
    id: UserId,
) -> (FetchSource, FetchResult<String>) {
    debug!(%source, "Fetch started");

    let result = AssertUnwindSafe(fetcher.fetch(&scope, id))
        .catch_unwind()
        .await
        .unwrap_or(Err(FetchError::Panicked { provider: source }));

    match &result {
        Ok(_) => debug!(%source, "Fetch succeeded"),
        Err(error) => debug!(%source, %error, "Fetch failed"),
    }

    (source, result)
}
