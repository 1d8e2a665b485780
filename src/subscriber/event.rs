//! Events delivered to the subscriber's owner

use std::net::SocketAddr;

use crate::protocol::ContentType;
use crate::shape::Shape;

/// Events from the subscriber's receive loop
#[derive(Debug)]
pub enum SubscriberEvent {
    /// A notification was decoded into a shape
    Notification {
        source: SocketAddr,
        content_type: ContentType,
        shape: Box<dyn Shape>,
    },

    /// A publisher acknowledged a control request
    Ack { publisher: SocketAddr },

    /// A publisher missed too many liveness windows
    PublisherLost { publisher: SocketAddr },
}
