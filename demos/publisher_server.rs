//! Publisher demo - publishes SQUARE every second and CIRCLE every two
//!
//! Run with: cargo run --example publisher_server [PORT]
//!
//! Pair it with `cargo run --example subscriber`. The publisher stops after
//! 100 seconds or on Ctrl+C. Logs go to the console and to `log/pub_<ts>.log`.

#[path = "common/logging.rs"]
mod logging;

use std::time::Duration;

use serde_json::json;
use shape_pubsub::protocol::constants::DEFAULT_CONTROL_PORT;
use shape_pubsub::protocol::ContentType;
use shape_pubsub::{PublishJob, Publisher, PublisherConfig};

const RUN_FOR: Duration = Duration::from_secs(100);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u16>()?,
        None => DEFAULT_CONTROL_PORT,
    };

    let _log_guard = logging::init("pub", &["shape_pubsub=debug", "publisher_server=debug"])?;

    let jobs = vec![
        PublishJob::every_secs(ContentType::SQUARE, 1, vec![json!(4), json!(4), json!("green")]),
        PublishJob::every_secs(ContentType::CIRCLE, 2, vec![json!(5), json!("blue")]),
    ];

    let mut publisher = Publisher::bind(PublisherConfig::with_port(port), jobs).await?;
    publisher.publish()?;
    println!("Publishing on port {} for {}s", port, RUN_FOR.as_secs());

    tokio::select! {
        _ = tokio::time::sleep(RUN_FOR) => {}
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
        }
    }

    publisher.stop().await?;

    let stats = publisher.stats();
    println!(
        "Stats: requests={} dropped={} acks={} notifications={} evictions={}",
        stats.requests_received,
        stats.requests_dropped,
        stats.acks_sent,
        stats.notifications_sent,
        stats.evictions,
    );

    Ok(())
}
