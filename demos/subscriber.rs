//! Subscriber demo - subscribes, drops CIRCLE, adds it back, then leaves
//!
//! Run with: cargo run --example subscriber [RECV_PORT]
//!
//! RECV_PORT defaults to 10001. Ports below 1024 need root on Linux.
//! Expects `cargo run --example publisher_server` on the default port.
//! Logs go to the console and to `log/sub_<ts>.log`.
//!
//! Timeline:
//! - t=0   subscribe to SQUARE, CIRCLE and TRIANGLE
//! - t=15  unsubscribe CIRCLE
//! - t=30  add CIRCLE back
//! - t=55  unsubscribe everything (stops the subscriber)

#[path = "common/logging.rs"]
mod logging;

use std::time::Duration;

use shape_pubsub::protocol::constants::DEFAULT_CONTROL_PORT;
use shape_pubsub::protocol::ContentType;
use shape_pubsub::{ShapeSubscriber, Subscriber, SubscriberConfig, SubscriberEvent};

/// Unprivileged, so the demo runs without root
const DEFAULT_RECV_PORT: u16 = 10001;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let recv_port = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u16>()?,
        None => DEFAULT_RECV_PORT,
    };

    let _log_guard = logging::init("sub", &["shape_pubsub=info", "subscriber=debug"])?;

    let config = SubscriberConfig::with_ports(DEFAULT_CONTROL_PORT, recv_port).interests([
        ContentType::SQUARE,
        ContentType::CIRCLE,
        ContentType::TRIANGLE,
    ]);
    let (mut subscriber, mut events) = Subscriber::bind(config).await?;

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                SubscriberEvent::Notification { source, shape, .. } => {
                    println!("[{}] {}", source, shape.describe());
                }
                SubscriberEvent::PublisherLost { publisher } => {
                    println!("[{}] publisher lost", publisher);
                }
                SubscriberEvent::Ack { .. } => {}
            }
        }
    });

    subscriber.subscribe().await?;
    println!("Receiving on {}", subscriber.callback());

    tokio::time::sleep(Duration::from_secs(15)).await;
    subscriber.unsubscribe(Some(&[ContentType::CIRCLE])).await?;

    tokio::time::sleep(Duration::from_secs(15)).await;
    subscriber.add_shapes(&[ContentType::CIRCLE]).await;

    tokio::time::sleep(Duration::from_secs(25)).await;
    subscriber.unsubscribe(None).await?;

    let stats = subscriber.stats();
    println!(
        "Stats: registrations={} unregistrations={} acks={} notifications={} errors={}",
        stats.registrations_sent,
        stats.unregistrations_sent,
        stats.acks_received,
        stats.notifications_received,
        stats.decode_errors,
    );

    drop(subscriber);
    printer.await?;
    Ok(())
}
