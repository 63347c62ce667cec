/// Test helper functions and aggregator builders
use dashboard_lib::modules::dashboard::{DiagnosticEvent, DiagnosticSink};
use dashboard_lib::{AggregationError, Aggregator, AggregatorConfig, MockService, Scope, UserId};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Allowance for scheduling jitter on top of a configured timeout
pub const SLACK: Duration = Duration::from_millis(50);

/// Build an aggregator over two mock services with the given timeout
pub fn build_aggregator(profile: MockService, order: MockService, timeout: Duration) -> Aggregator {
    Aggregator::new(
        Arc::new(profile),
        Arc::new(order),
        AggregatorConfig::default().with_timeout(timeout),
    )
}

/// Run one aggregate call from a background scope and time it
pub async fn timed_aggregate(
    aggregator: &Aggregator,
    id: UserId,
) -> (Result<String, AggregationError>, Duration) {
    let start = Instant::now();
    let result = aggregator.aggregate(&Scope::background(), id).await;
    (result, start.elapsed())
}

/// Sink that keeps every record for later inspection
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, event: &DiagnosticEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
