use crate::modules::provider::UserId;
use crate::shared::errors::FetchResult;
use crate::shared::scope::Scope;
use async_trait::async_trait;

/// Upstream data source queried by the aggregator
///
/// Implementations must watch `scope` while they work: once `scope.done()`
/// resolves they return `Err(scope.error())` without waiting for their own
/// work to finish, and they must not leave anything running in the background
/// after returning.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetchable: Send + Sync {
    /// Fetch the payload for `id`
    async fn fetch(&self, scope: &Scope, id: UserId) -> FetchResult<String>;
}
