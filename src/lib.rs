pub mod modules;
pub mod shared;

// Re-exports for the entry point and integration tests
pub use modules::{
    dashboard::{Aggregator, AggregatorConfig},
    provider::{Fetchable, FetchSource, MockService, UserId},
};
pub use shared::{AggregationError, FetchError, Scope};
