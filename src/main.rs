use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use dashboard_lib::modules::dashboard::{config::parse_duration_ms, TracingSink};
use dashboard_lib::shared::utils::init_logger;
use dashboard_lib::{Aggregator, AggregatorConfig, MockService, Scope, UserId};

/// Environment variable overriding the demo order service latency
const ORDER_DELAY_ENV: &str = "DASHBOARD_ORDER_DELAY_MS";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    init_logger();

    let config = AggregatorConfig::from_env()
        .context("Failed to load aggregator configuration")?
        .with_diagnostics(Arc::new(TracingSink));

    // The demo order service is slow enough to trip the default timeout
    let order_delay = match std::env::var(ORDER_DELAY_ENV) {
        Ok(raw) => parse_duration_ms(ORDER_DELAY_ENV, &raw)?,
        Err(_) => Duration::from_secs(10),
    };

    let aggregator = Aggregator::new(
        Arc::new(
            MockService::profile()
                .with_response("Name: Alice")
                .with_delay(Duration::from_millis(500)),
        ),
        Arc::new(MockService::order().with_delay(order_delay)),
        config,
    );

    match aggregator.aggregate(&Scope::background(), UserId(1)).await {
        Ok(summary) => {
            println!("{}", summary);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Failed to aggregate user");
            std::process::exit(1);
        }
    }
}
