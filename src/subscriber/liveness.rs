//! Publisher liveness tracking
//!
//! Each publisher is expected to ACK at least once per window (it ACKs every
//! registration, and registrations repeat every announce interval). A
//! publisher's miss count is the number of whole windows since its last ACK;
//! it is reported lost once the count reaches the threshold. ACKs from one
//! publisher never change another publisher's count.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Liveness state for one publisher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherLivenessRecord {
    /// Whole windows elapsed since the last ACK
    pub miss_count: u32,
    /// Payload of the last ACK
    pub last_message: String,
    pub last_seen: Instant,
    /// Reported lost and not heard from since
    pub lost: bool,
}

/// Per-publisher ACK recency
#[derive(Debug)]
pub struct LivenessTracker {
    window: Duration,
    threshold: u32,
    publishers: HashMap<SocketAddr, PublisherLivenessRecord>,
}

impl LivenessTracker {
    pub fn new(window: Duration, threshold: u32) -> Self {
        Self {
            window: window.max(Duration::from_millis(1)),
            threshold: threshold.max(1),
            publishers: HashMap::new(),
        }
    }

    /// Record an ACK from `publisher`
    ///
    /// Returns `true` if the publisher had been reported lost.
    pub fn record_ack(&mut self, publisher: SocketAddr, message: &str, now: Instant) -> bool {
        let record = self
            .publishers
            .entry(publisher)
            .or_insert_with(|| PublisherLivenessRecord {
                miss_count: 0,
                last_message: String::new(),
                last_seen: now,
                lost: false,
            });

        record.miss_count = 0;
        record.last_message.clear();
        record.last_message.push_str(message);
        record.last_seen = now;

        std::mem::replace(&mut record.lost, false)
    }

    /// Recompute miss counts at `now`
    ///
    /// Returns publishers that crossed the threshold in this sweep.
    pub fn sweep(&mut self, now: Instant) -> Vec<SocketAddr> {
        let mut newly_lost = Vec::new();

        for (addr, record) in &mut self.publishers {
            let silent = now.saturating_duration_since(record.last_seen);
            let windows = silent.as_nanos() / self.window.as_nanos();
            record.miss_count = u32::try_from(windows).unwrap_or(u32::MAX);

            if !record.lost && record.miss_count >= self.threshold {
                record.lost = true;
                newly_lost.push(*addr);
            }
        }

        newly_lost
    }

    pub fn get(&self, publisher: &SocketAddr) -> Option<&PublisherLivenessRecord> {
        self.publishers.get(publisher)
    }

    /// Number of publishers ever heard from
    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }

    /// Publishers currently considered lost
    pub fn lost(&self) -> impl Iterator<Item = SocketAddr> + '_ {
        self.publishers
            .iter()
            .filter(|(_, record)| record.lost)
            .map(|(addr, _)| *addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    const WINDOW: Duration = Duration::from_secs(10);

    #[test]
    fn test_ack_resets_misses() {
        let mut tracker = LivenessTracker::new(WINDOW, 3);
        let t0 = Instant::now();

        assert!(!tracker.record_ack(addr(1), "ACK", t0));
        tracker.sweep(t0 + Duration::from_secs(25));
        assert_eq!(tracker.get(&addr(1)).unwrap().miss_count, 2);

        tracker.record_ack(addr(1), "ACK", t0 + Duration::from_secs(26));
        let record = tracker.get(&addr(1)).unwrap();
        assert_eq!(record.miss_count, 0);
        assert_eq!(record.last_message, "ACK");
    }

    #[test]
    fn test_lost_after_threshold_windows_reported_once() {
        let mut tracker = LivenessTracker::new(WINDOW, 3);
        let t0 = Instant::now();
        tracker.record_ack(addr(1), "ACK", t0);

        assert!(tracker.sweep(t0 + Duration::from_secs(29)).is_empty());
        assert_eq!(tracker.sweep(t0 + Duration::from_secs(30)), vec![addr(1)]);
        assert!(tracker.sweep(t0 + Duration::from_secs(45)).is_empty());
        assert_eq!(tracker.lost().collect::<Vec<_>>(), vec![addr(1)]);

        // Heard from again
        assert!(tracker.record_ack(addr(1), "ACK", t0 + Duration::from_secs(50)));
        assert_eq!(tracker.lost().count(), 0);
    }

    #[test]
    fn test_one_publisher_does_not_charge_another() {
        let mut tracker = LivenessTracker::new(WINDOW, 3);
        let t0 = Instant::now();
        tracker.record_ack(addr(1), "ACK", t0);
        tracker.record_ack(addr(2), "ACK", t0);

        // Many ACKs from publisher 1 inside one window
        for i in 1..=20 {
            let now = t0 + Duration::from_millis(i * 400);
            tracker.record_ack(addr(1), "ACK", now);
            assert!(tracker.sweep(now).is_empty());
        }

        assert_eq!(tracker.get(&addr(2)).unwrap().miss_count, 0);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_silent_publisher_lost_while_other_alive() {
        let mut tracker = LivenessTracker::new(WINDOW, 3);
        let t0 = Instant::now();
        tracker.record_ack(addr(1), "ACK", t0);
        tracker.record_ack(addr(2), "ACK", t0);

        let mut lost = Vec::new();
        for secs in (5..=40).step_by(5) {
            let now = t0 + Duration::from_secs(secs);
            tracker.record_ack(addr(1), "ACK", now);
            lost.extend(tracker.sweep(now));
        }

        assert_eq!(lost, vec![addr(2)]);
        assert!(!tracker.get(&addr(1)).unwrap().lost);
    }
}
