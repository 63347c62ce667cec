// Shared kernel used by every module
// Errors, cancellation scopes and logging helpers

pub mod errors; // Shared error types
pub mod scope; // Cancellation/deadline scopes
pub mod utils; // Logging utilities

// Re-exports for convenience
pub use errors::{AggregationError, AggregationResult, ConfigError, FetchError, FetchResult};
pub use scope::Scope;
