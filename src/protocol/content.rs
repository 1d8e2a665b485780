//! Content types and endpoints
//!
//! The two keys of the subscription registry: what kind of notification a
//! subscriber wants, and where to send it.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tag identifying a notification's payload shape
///
/// Serialized as a bare integer. Three values are known; any other code is
/// representable and becomes deliverable once a creator is registered with
/// the [`ShapeFactory`](crate::shape::ShapeFactory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentType(u32);

impl ContentType {
    pub const CIRCLE: Self = Self(1);
    pub const SQUARE: Self = Self(2);
    pub const TRIANGLE: Self = Self(3);

    /// All built-in content types
    pub const KNOWN: [Self; 3] = [Self::CIRCLE, Self::SQUARE, Self::TRIANGLE];

    /// Create a content type from its wire code
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Wire code
    pub const fn code(self) -> u32 {
        self.0
    }

    /// Name of a built-in type
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::CIRCLE => Some("CIRCLE"),
            Self::SQUARE => Some("SQUARE"),
            Self::TRIANGLE => Some("TRIANGLE"),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "TYPE_{}", self.0),
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    /// Accepts a built-in name (any case) or a numeric code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u32>() {
            return Ok(Self(code));
        }
        Self::KNOWN
            .into_iter()
            .find(|ty| ty.name().is_some_and(|n| n.eq_ignore_ascii_case(s)))
            .ok_or_else(|| format!("unknown content type: {s}"))
    }
}

/// A subscriber's unicast receive socket
///
/// Equality is exact on both address and port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub ip: IpAddr,
    pub port: u16,
}

impl Endpoint {
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self { ip, port }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.socket_addr().fmt(f)
    }
}
