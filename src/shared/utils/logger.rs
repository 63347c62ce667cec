use std::str::FromStr;
use std::sync::Once;
use std::time::{Duration, Instant};

use tracing::{debug, info, Level};

static INIT: Once = Once::new();

/// Environment variable holding the maximum log level
pub const LOG_LEVEL_ENV: &str = "DASHBOARD_LOG";

/// Initialize the logging system
/// This should be called once at application startup
pub fn init_logger() {
    INIT.call_once(|| {
        let level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|raw| parse_level(&raw))
            .unwrap_or(Level::INFO);

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();

        info!(%level, "Logging system initialized");
    });
}

/// Parse a level name such as `debug` or `WARN`; unknown names yield `None`
pub fn parse_level(raw: &str) -> Option<Level> {
    Level::from_str(raw.trim()).ok()
}

/// Helper for timing operations
pub struct TimedOperation {
    start: Instant,
    operation: &'static str,
}

impl TimedOperation {
    pub fn new(operation: &'static str) -> Self {
        debug!("Starting: {}", operation);
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Log the elapsed time and return it
    pub fn finish(self) -> Duration {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            elapsed_ms = duration.as_millis() as u64,
            "Performance: {} took {:?}",
            self.operation,
            duration
        );
        duration
    }
}
