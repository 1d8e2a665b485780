//! Publisher and subscriber interfaces
//!
//! Each trait has one implementation in this crate: [`Publisher`] and
//! [`Subscriber`].
//!
//! [`Publisher`]: crate::publisher::Publisher
//! [`Subscriber`]: crate::subscriber::Subscriber

use serde_json::Value;

use crate::error::Result;
use crate::protocol::{ContentType, Endpoint};

/// Publishing side of the protocol
#[allow(async_fn_in_trait)]
pub trait ShapePublisher {
    /// Register `endpoint` for `content_type`
    ///
    /// Idempotent; returns `true` if membership changed.
    async fn register(&self, content_type: ContentType, endpoint: Endpoint) -> bool;

    /// Unregister `endpoint` from `content_type`
    ///
    /// Idempotent; returns `true` if membership changed.
    async fn unregister(&self, content_type: ContentType, endpoint: Endpoint) -> bool;

    /// Send one notification to every endpoint registered for `content_type`
    ///
    /// Returns the number of endpoints the notification was sent to. Failed
    /// endpoints are evicted.
    async fn notify(&self, content_type: ContentType, params: &[Value]) -> usize;
}

/// Subscribing side of the protocol
#[allow(async_fn_in_trait)]
pub trait ShapeSubscriber {
    /// Start announcing interests and receiving notifications
    async fn subscribe(&mut self) -> Result<()>;

    /// Stop receiving `types`, or every current type when `None`
    ///
    /// Returns the types actually removed. Stops the subscriber once no
    /// interests remain.
    async fn unsubscribe(&mut self, types: Option<&[ContentType]>) -> Result<Vec<ContentType>>;

    /// Add content types to the interest set
    ///
    /// Returns the types that were not already present.
    async fn add_shapes(&self, types: &[ContentType]) -> Vec<ContentType>;

    /// Stop announcing and receiving
    async fn stop(&mut self) -> Result<()>;
}
