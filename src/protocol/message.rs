//! Protocol messages
//!
//! Three kinds of datagram travel between the two sides:
//!
//! ```text
//! Subscriber                                   Publisher
//!   |-- {"request":"register",...} ------------>|  control channel
//!   |<------------------------------- "ACK" ----|  unicast, per request
//!   |<-------- {"type":2,"params":[...]} -------|  unicast, per tick
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::{ContentType, Endpoint};

/// Control request tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Register,
    Unregister,
    /// Any other tag; carries no registry effect
    Other(String),
}

impl RequestKind {
    pub fn as_str(&self) -> &str {
        match self {
            RequestKind::Register => "register",
            RequestKind::Unregister => "unregister",
            RequestKind::Other(tag) => tag,
        }
    }
}

impl From<String> for RequestKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "register" => RequestKind::Register,
            "unregister" => RequestKind::Unregister,
            _ => RequestKind::Other(tag),
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Register or unregister request sent on the control channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRequest {
    pub kind: RequestKind,
    pub content_type: ContentType,
    /// Where the publisher should send ACKs and notifications
    pub callback: Endpoint,
}

impl ControlRequest {
    pub fn register(content_type: ContentType, callback: Endpoint) -> Self {
        Self {
            kind: RequestKind::Register,
            content_type,
            callback,
        }
    }

    pub fn unregister(content_type: ContentType, callback: Endpoint) -> Self {
        Self {
            kind: RequestKind::Unregister,
            content_type,
            callback,
        }
    }
}

/// Wire layout of a control request
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct RawControlRequest {
    pub request: String,
    pub shape: ContentType,
    pub udp_port: u16,
    pub udp_ip: String,
}

/// A typed notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub params: Vec<Value>,
}

impl Notification {
    pub fn new(content_type: ContentType, params: Vec<Value>) -> Self {
        Self {
            content_type,
            params,
        }
    }
}

/// Borrowed form used when encoding, so a job's params are not cloned per tick
#[derive(Serialize)]
pub(super) struct NotificationRef<'a> {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub params: &'a [Value],
}

/// Anything a subscriber can receive on its unicast socket
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Ack,
    Notification(Notification),
}
