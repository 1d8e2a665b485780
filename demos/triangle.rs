//! TRIANGLE demo - one publisher and one subscriber for a single type
//!
//! Run with:
//!   cargo run --example triangle -- pub    # publishes TRIANGLE every 2s for 30s
//!   cargo run --example triangle -- sub    # listens on 9997 for 40s
//!
//! Both modes log to the console and to `log/triangle_<mode>_<ts>.log`. The
//! publisher can run alongside `publisher_server` on the same port.

#[path = "common/logging.rs"]
mod logging;

use std::time::Duration;

use serde_json::json;
use shape_pubsub::protocol::constants::DEFAULT_CONTROL_PORT;
use shape_pubsub::protocol::ContentType;
use shape_pubsub::{
    PublishJob, Publisher, PublisherConfig, ShapeSubscriber, Subscriber, SubscriberConfig,
    SubscriberEvent,
};

fn print_usage() {
    eprintln!("Usage: triangle <pub|sub>");
}

async fn run_publisher() -> Result<(), Box<dyn std::error::Error>> {
    let jobs = vec![PublishJob::every_secs(
        ContentType::TRIANGLE,
        2,
        vec![json!(4), json!(4), json!("cyan")],
    )];

    let mut publisher = Publisher::bind(PublisherConfig::with_port(DEFAULT_CONTROL_PORT), jobs).await?;
    publisher.publish()?;
    tokio::time::sleep(Duration::from_secs(30)).await;
    publisher.stop().await?;

    println!("Sent {} notifications", publisher.stats().notifications_sent);
    Ok(())
}

async fn run_subscriber() -> Result<(), Box<dyn std::error::Error>> {
    let config = SubscriberConfig::with_ports(DEFAULT_CONTROL_PORT, 9997)
        .interests([ContentType::TRIANGLE]);
    let (mut subscriber, mut events) = Subscriber::bind(config).await?;
    subscriber.subscribe().await?;

    let deadline = tokio::time::Instant::now() + Duration::from_secs(40);
    while let Ok(Some(event)) = tokio::time::timeout_at(deadline, events.recv()).await {
        if let SubscriberEvent::Notification { shape, .. } = event {
            println!("{}", shape.describe());
        }
    }

    subscriber.unsubscribe(None).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mode = std::env::args().nth(1);
    let prefix = match mode.as_deref() {
        Some("pub") => "triangle_pub",
        Some("sub") => "triangle_sub",
        _ => {
            print_usage();
            std::process::exit(1);
        }
    };
    let _log_guard = logging::init(prefix, &["shape_pubsub=info"])?;

    if prefix == "triangle_pub" {
        run_publisher().await
    } else {
        run_subscriber().await
    }
}
