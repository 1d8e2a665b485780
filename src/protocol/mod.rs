//! Wire protocol
//!
//! Content types, endpoints, message envelopes and their JSON codec.

pub mod codec;
pub mod constants;
pub mod content;
pub mod message;

pub use content::{ContentType, Endpoint};
pub use message::{ControlRequest, Inbound, Notification, RequestKind};
