//! Statistics for publishers and subscribers
//!
//! Counters are updated lock-free from the running loops and read as a
//! point-in-time snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live publisher counters
#[derive(Debug, Default)]
pub struct PublisherCounters {
    requests_received: AtomicU64,
    requests_dropped: AtomicU64,
    acks_sent: AtomicU64,
    notifications_sent: AtomicU64,
    evictions: AtomicU64,
}

impl PublisherCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn request_received(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn request_dropped(&self) {
        self.requests_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn ack_sent(&self) {
        self.acks_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn notifications_sent(&self, count: u64) {
        self.notifications_sent.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn evicted(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PublisherStats {
        PublisherStats {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            requests_dropped: self.requests_dropped.load(Ordering::Relaxed),
            acks_sent: self.acks_sent.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// Publisher statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublisherStats {
    /// Control datagrams that decoded into a request
    pub requests_received: u64,
    /// Control datagrams dropped as undecodable
    pub requests_dropped: u64,
    /// ACKs delivered to subscribers
    pub acks_sent: u64,
    /// Individual notification datagrams sent
    pub notifications_sent: u64,
    /// Endpoints removed after a failed send
    pub evictions: u64,
}

/// Live subscriber counters
#[derive(Debug, Default)]
pub struct SubscriberCounters {
    registrations_sent: AtomicU64,
    unregistrations_sent: AtomicU64,
    acks_received: AtomicU64,
    notifications_received: AtomicU64,
    decode_errors: AtomicU64,
    publishers_lost: AtomicU64,
}

impl SubscriberCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn registration_sent(&self) {
        self.registrations_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn unregistration_sent(&self) {
        self.unregistrations_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn ack_received(&self) {
        self.acks_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn notification_received(&self) {
        self.notifications_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn publisher_lost(&self) {
        self.publishers_lost.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SubscriberStats {
        SubscriberStats {
            registrations_sent: self.registrations_sent.load(Ordering::Relaxed),
            unregistrations_sent: self.unregistrations_sent.load(Ordering::Relaxed),
            acks_received: self.acks_received.load(Ordering::Relaxed),
            notifications_received: self.notifications_received.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            publishers_lost: self.publishers_lost.load(Ordering::Relaxed),
        }
    }
}

/// Subscriber statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberStats {
    /// Register requests sent (including every periodic re-send)
    pub registrations_sent: u64,
    /// Unregister requests sent
    pub unregistrations_sent: u64,
    /// ACK markers received
    pub acks_received: u64,
    /// Notifications decoded and delivered
    pub notifications_received: u64,
    /// Datagrams that failed to decode or build a shape
    pub decode_errors: u64,
    /// Times a publisher crossed the miss threshold
    pub publishers_lost: u64,
}
