pub mod config;
pub mod diagnostics;
pub mod service;

// Re-exports for easy external access
pub use config::{AggregatorConfig, DEFAULT_TIMEOUT};
pub use diagnostics::{DiagnosticEvent, DiagnosticSink, JsonLinesSink, NoopSink, TracingSink};
pub use service::Aggregator;
