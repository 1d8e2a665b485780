//! Multicast publish/subscribe for shape notifications
//!
//! Subscribers announce interest in content types to a publisher's control
//! address (a multicast group by default) and receive notifications on their
//! own unicast socket. Registration is soft state: subscribers re-announce on
//! an interval and the publisher ACKs every request, which doubles as a
//! liveness signal.
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use shape_pubsub::protocol::ContentType;
//! use shape_pubsub::{
//!     PublishJob, Publisher, PublisherConfig, ShapeSubscriber, Subscriber, SubscriberConfig,
//! };
//!
//! # async fn example() -> shape_pubsub::error::Result<()> {
//! let jobs = vec![PublishJob::every_secs(
//!     ContentType::SQUARE,
//!     1,
//!     vec![json!(4), json!(4), json!("green")],
//! )];
//! let mut publisher = Publisher::bind(PublisherConfig::with_port(4545), jobs).await?;
//! publisher.publish()?;
//!
//! let config = SubscriberConfig::with_ports(4545, 9998).interests([ContentType::SQUARE]);
//! let (mut subscriber, mut events) = Subscriber::bind(config).await?;
//! subscriber.subscribe().await?;
//!
//! while let Some(event) = events.recv().await {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod protocol;
pub mod publisher;
pub mod registry;
pub mod shape;
pub mod stats;
pub mod subscriber;
pub mod transport;

mod shutdown;

pub use api::{ShapePublisher, ShapeSubscriber};
pub use error::{Error, Result};
pub use publisher::{PublishJob, Publisher, PublisherConfig};
pub use subscriber::{Subscriber, SubscriberConfig, SubscriberEvent};
