//! Subscriber side
//!
//! ```text
//!  InterestSet ──► Announcer ──► control sender ──► publisher
//!                                                      │
//!  events ◄── NotificationReceiver ◄── unicast socket ◄┘  (ACKs, notifications)
//!                  │
//!                  └── LivenessTracker
//! ```

mod announcer;
pub mod client;
pub mod config;
pub mod event;
pub mod interest;
pub mod liveness;
mod receiver;

pub use client::Subscriber;
pub use config::SubscriberConfig;
pub use event::SubscriberEvent;
pub use interest::InterestSet;
pub use liveness::{LivenessTracker, PublisherLivenessRecord};
