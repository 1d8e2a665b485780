//! Runtime statistics

pub mod metrics;

pub use metrics::{PublisherCounters, PublisherStats, SubscriberCounters, SubscriberStats};
