//! Protocol constants

use std::net::Ipv4Addr;
use std::time::Duration;

/// Default multicast group for the control channel
pub const DEFAULT_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 0, 1);

/// Default publisher control port
pub const DEFAULT_CONTROL_PORT: u16 = 4545;

/// Receive buffer size; one message per datagram
pub const MAX_DATAGRAM_SIZE: usize = 1024;

/// Multicast TTL for control traffic
pub const MULTICAST_TTL: u32 = 64;

/// Literal payload of an acknowledgement datagram
pub const ACK_MARKER: &[u8] = b"ACK";

/// How often a subscriber repeats its registrations
pub const DEFAULT_ANNOUNCE_INTERVAL: Duration = Duration::from_secs(10);

/// Upper bound on a single subscriber receive wait
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(3);

/// Silent windows after which a publisher is reported lost
pub const DEFAULT_MISS_THRESHOLD: u32 = 3;

/// Bounded wait when joining a stopped task
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);
