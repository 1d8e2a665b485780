//! Publisher configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde_json::Value;

use crate::protocol::constants::*;
use crate::protocol::ContentType;

/// Publisher configuration options
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Address the control socket binds to
    pub bind_addr: SocketAddr,

    /// Multicast group joined by the control socket (None = unicast only)
    pub multicast_group: Option<Ipv4Addr>,

    /// Bounded wait for tasks on stop
    pub shutdown_timeout: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self::with_port(DEFAULT_CONTROL_PORT)
    }
}

impl PublisherConfig {
    /// Listen on all interfaces at `port`, joined to the default group
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
            multicast_group: Some(DEFAULT_GROUP),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the multicast group
    pub fn multicast_group(mut self, group: Ipv4Addr) -> Self {
        self.multicast_group = Some(group);
        self
    }

    /// Accept control traffic by unicast only
    pub fn without_multicast(mut self) -> Self {
        self.multicast_group = None;
        self
    }

    /// Set the shutdown timeout
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

/// One periodic notification stream
#[derive(Debug, Clone, PartialEq)]
pub struct PublishJob {
    /// Content type pushed by this job
    pub content_type: ContentType,

    /// Time between ticks
    pub frequency: Duration,

    /// Notification params, identical on every tick
    pub params: Vec<Value>,
}

impl PublishJob {
    pub fn new(content_type: ContentType, frequency: Duration, params: Vec<Value>) -> Self {
        Self {
            content_type,
            frequency,
            params,
        }
    }

    /// Job ticking every `secs` seconds
    pub fn every_secs(content_type: ContentType, secs: u64, params: Vec<Value>) -> Self {
        Self::new(content_type, Duration::from_secs(secs), params)
    }
}
