//! Subscriber configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::protocol::constants::*;
use crate::protocol::ContentType;

/// Subscriber configuration options
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Publisher control address (multicast group or unicast host)
    pub publisher_addr: SocketAddr,

    /// Address of the unicast socket receiving ACKs and notifications
    pub bind_addr: SocketAddr,

    /// IP advertised to the publisher (None = derive from the bound socket)
    pub callback_ip: Option<IpAddr>,

    /// Initial interest set
    pub interests: Vec<ContentType>,

    /// Time between registration announcements
    pub announce_interval: Duration,

    /// Upper bound on one receive wait
    pub poll_timeout: Duration,

    /// A publisher is charged one miss per window without an ACK
    pub liveness_window: Duration,

    /// Misses before a publisher is reported lost
    pub miss_threshold: u32,

    /// Capacity of the event channel
    pub event_capacity: usize,

    /// Bounded wait for tasks on stop
    pub shutdown_timeout: Duration,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self::with_ports(DEFAULT_CONTROL_PORT, 9998)
    }
}

impl SubscriberConfig {
    /// Talk to the default group on `publisher_port`, receive on `receive_port`
    pub fn with_ports(publisher_port: u16, receive_port: u16) -> Self {
        Self {
            publisher_addr: SocketAddr::new(IpAddr::V4(DEFAULT_GROUP), publisher_port),
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), receive_port),
            callback_ip: None,
            interests: Vec::new(),
            announce_interval: DEFAULT_ANNOUNCE_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            liveness_window: DEFAULT_ANNOUNCE_INTERVAL,
            miss_threshold: DEFAULT_MISS_THRESHOLD,
            event_capacity: 256,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// Set the publisher control address
    pub fn publisher(mut self, addr: SocketAddr) -> Self {
        self.publisher_addr = addr;
        self
    }

    /// Set the receive socket address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Advertise a specific callback IP
    pub fn callback_ip(mut self, ip: IpAddr) -> Self {
        self.callback_ip = Some(ip);
        self
    }

    /// Set the initial interest set
    pub fn interests(mut self, types: impl IntoIterator<Item = ContentType>) -> Self {
        self.interests = types.into_iter().collect();
        self
    }

    /// Set the announce interval
    ///
    /// The liveness window follows it unless set explicitly afterwards.
    pub fn announce_interval(mut self, interval: Duration) -> Self {
        self.announce_interval = interval;
        self.liveness_window = interval;
        self
    }

    /// Set the receive poll timeout
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Set the liveness window
    pub fn liveness_window(mut self, window: Duration) -> Self {
        self.liveness_window = window;
        self
    }

    /// Set the miss threshold
    pub fn miss_threshold(mut self, threshold: u32) -> Self {
        self.miss_threshold = threshold;
        self
    }

    /// Set the event channel capacity
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Set the shutdown timeout
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SubscriberConfig::default();

        assert_eq!(config.publisher_addr, "239.255.0.1:4545".parse::<SocketAddr>().unwrap());
        assert_eq!(config.bind_addr.port(), 9998);
        assert!(config.callback_ip.is_none());
        assert!(config.interests.is_empty());
        assert_eq!(config.announce_interval, Duration::from_secs(10));
        assert_eq!(config.poll_timeout, Duration::from_secs(3));
        assert_eq!(config.miss_threshold, 3);
    }

    #[test]
    fn test_announce_interval_moves_window() {
        let config = SubscriberConfig::default().announce_interval(Duration::from_secs(1));
        assert_eq!(config.liveness_window, Duration::from_secs(1));

        let config = config.liveness_window(Duration::from_secs(4));
        assert_eq!(config.announce_interval, Duration::from_secs(1));
        assert_eq!(config.liveness_window, Duration::from_secs(4));
    }

    #[test]
    fn test_builder_chaining() {
        let config = SubscriberConfig::with_ports(5000, 1001)
            .interests([ContentType::SQUARE, ContentType::CIRCLE])
            .callback_ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)))
            .poll_timeout(Duration::from_millis(100))
            .miss_threshold(5)
            .event_capacity(0);

        assert_eq!(config.publisher_addr.port(), 5000);
        assert_eq!(config.bind_addr.port(), 1001);
        assert_eq!(config.interests, vec![ContentType::SQUARE, ContentType::CIRCLE]);
        assert_eq!(config.callback_ip, Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))));
        assert_eq!(config.poll_timeout, Duration::from_millis(100));
        assert_eq!(config.miss_threshold, 5);
        assert_eq!(config.event_capacity, 1);
    }
}
