//! Subscriber
//!
//! High-level API for registering interest with a publisher and receiving
//! its notifications.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::announcer::{send_requests, Announcer};
use super::config::SubscriberConfig;
use super::event::SubscriberEvent;
use super::interest::InterestSet;
use super::liveness::LivenessTracker;
use super::receiver::NotificationReceiver;
use crate::api::ShapeSubscriber;
use crate::error::{Result, StateError};
use crate::protocol::{ContentType, Endpoint, RequestKind};
use crate::shape::ShapeFactory;
use crate::shutdown::join_bounded;
use crate::stats::{SubscriberCounters, SubscriberStats};
use crate::transport::{bind_sender, local_ip_toward};

/// Tasks and sockets that exist only while subscribed
struct Running {
    sender: Arc<UdpSocket>,
    cancel: CancellationToken,
    announcer: JoinHandle<()>,
    receiver: JoinHandle<()>,
}

/// Multicast shape subscriber
///
/// # Example
/// ```no_run
/// use shape_pubsub::protocol::ContentType;
/// use shape_pubsub::subscriber::{Subscriber, SubscriberConfig, SubscriberEvent};
/// use shape_pubsub::ShapeSubscriber;
///
/// # async fn example() -> shape_pubsub::error::Result<()> {
/// let config = SubscriberConfig::with_ports(4545, 9998)
///     .interests([ContentType::SQUARE, ContentType::CIRCLE]);
/// let (mut subscriber, mut events) = Subscriber::bind(config).await?;
///
/// tokio::spawn(async move {
///     while let Some(event) = events.recv().await {
///         if let SubscriberEvent::Notification { shape, .. } = event {
///             println!("{}", shape.describe());
///         }
///     }
/// });
///
/// subscriber.subscribe().await?;
/// subscriber.unsubscribe(Some(&[ContentType::CIRCLE])).await?;
/// # Ok(())
/// # }
/// ```
pub struct Subscriber {
    config: SubscriberConfig,
    socket: Arc<UdpSocket>,
    callback: Endpoint,
    interests: Arc<Mutex<InterestSet>>,
    factory: Arc<ShapeFactory>,
    event_tx: mpsc::Sender<SubscriberEvent>,
    counters: Arc<SubscriberCounters>,
    running: Option<Running>,
}

impl Subscriber {
    /// Bind the unicast receive socket
    ///
    /// Returns the subscriber and a receiver for its events. Nothing is sent
    /// until [`subscribe`](ShapeSubscriber::subscribe).
    pub async fn bind(
        config: SubscriberConfig,
    ) -> Result<(Self, mpsc::Receiver<SubscriberEvent>)> {
        Self::with_factory(config, ShapeFactory::new()).await
    }

    /// Bind with a custom shape factory
    pub async fn with_factory(
        config: SubscriberConfig,
        factory: ShapeFactory,
    ) -> Result<(Self, mpsc::Receiver<SubscriberEvent>)> {
        let socket = UdpSocket::bind(config.bind_addr).await.inspect_err(|e| {
            tracing::error!(addr = %config.bind_addr, error = %e, "Failed to bind receive socket");
        })?;
        let local = socket.local_addr()?;

        let callback_ip = match config.callback_ip {
            Some(ip) => ip,
            None if local.ip().is_unspecified() => local_ip_toward(config.publisher_addr).await?,
            None => local.ip(),
        };
        let callback = Endpoint::new(callback_ip, local.port());

        let (tx, rx) = mpsc::channel(config.event_capacity.max(1));
        let interests = config.interests.iter().copied().collect::<InterestSet>();

        tracing::debug!(
            callback = %callback,
            publisher = %config.publisher_addr,
            shapes = ?interests.as_slice(),
            "Subscriber initialized"
        );

        let subscriber = Self {
            socket: Arc::new(socket),
            callback,
            interests: Arc::new(Mutex::new(interests)),
            factory: Arc::new(factory),
            event_tx: tx,
            counters: Arc::new(SubscriberCounters::new()),
            running: None,
            config,
        };

        Ok((subscriber, rx))
    }

    /// Endpoint advertised to the publisher
    pub fn callback(&self) -> Endpoint {
        self.callback
    }

    /// Publisher control address
    pub fn publisher_addr(&self) -> SocketAddr {
        self.config.publisher_addr
    }

    /// Snapshot of the interest set
    pub async fn interests(&self) -> Vec<ContentType> {
        self.interests.lock().await.to_vec()
    }

    /// Whether the announcer and receiver are running
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn stats(&self) -> SubscriberStats {
        self.counters.snapshot()
    }
}

impl ShapeSubscriber for Subscriber {
    async fn subscribe(&mut self) -> Result<()> {
        if self.running.is_some() {
            return Err(StateError::AlreadyRunning.into());
        }

        let sender = Arc::new(bind_sender(self.config.publisher_addr).await.inspect_err(|e| {
            tracing::error!(
                publisher = %self.config.publisher_addr,
                error = %e,
                "Failed to set up control sender"
            );
        })?);
        let cancel = CancellationToken::new();

        let announcer = Announcer {
            sender: Arc::clone(&sender),
            publisher: self.config.publisher_addr,
            callback: self.callback,
            interests: Arc::clone(&self.interests),
            counters: Arc::clone(&self.counters),
            interval: self.config.announce_interval,
        };
        let receiver = NotificationReceiver::new(
            Arc::clone(&self.factory),
            LivenessTracker::new(self.config.liveness_window, self.config.miss_threshold),
            self.event_tx.clone(),
            Arc::clone(&self.counters),
        );

        self.running = Some(Running {
            announcer: tokio::spawn(announcer.run(cancel.child_token())),
            receiver: tokio::spawn(receiver.run(
                Arc::clone(&self.socket),
                self.config.poll_timeout,
                cancel.child_token(),
            )),
            sender,
            cancel,
        });

        tracing::info!(
            callback = %self.callback,
            publisher = %self.config.publisher_addr,
            "Subscriber starting to listen"
        );
        Ok(())
    }

    async fn unsubscribe(&mut self, types: Option<&[ContentType]>) -> Result<Vec<ContentType>> {
        let Some(running) = self.running.as_ref() else {
            return Err(StateError::NotRunning.into());
        };

        let (removed, now_empty) = {
            let mut interests = self.interests.lock().await;
            let targets = match types {
                Some(types) => types.to_vec(),
                None => interests.to_vec(),
            };

            let mut removed = Vec::with_capacity(targets.len());
            for content_type in targets {
                if interests.remove(content_type) {
                    removed.push(content_type);
                } else {
                    tracing::error!(shape = %content_type, "Failed to unsubscribe: not subscribed");
                }
            }

            // Sent under the lock so no announcement re-registers a removed type after this
            send_requests(
                running.sender.as_ref(),
                self.config.publisher_addr,
                RequestKind::Unregister,
                &removed,
                self.callback,
                &self.counters,
            )
            .await;

            (removed, interests.is_empty())
        };

        tracing::info!(shapes = ?removed, "Sent unregister requests");

        if now_empty {
            self.stop().await?;
        }
        Ok(removed)
    }

    async fn add_shapes(&self, types: &[ContentType]) -> Vec<ContentType> {
        let mut interests = self.interests.lock().await;
        let mut added = Vec::with_capacity(types.len());

        for &content_type in types {
            if interests.add(content_type) {
                added.push(content_type);
            } else {
                tracing::debug!(shape = %content_type, "Already subscribed");
            }
        }

        tracing::info!(added = ?added, shapes = ?interests.as_slice(), "Adding shapes");
        added
    }

    async fn stop(&mut self) -> Result<()> {
        let Some(running) = self.running.take() else {
            return Err(StateError::NotRunning.into());
        };

        running.cancel.cancel();
        join_bounded(
            "subscriber",
            vec![running.announcer, running.receiver],
            self.config.shutdown_timeout,
        )
        .await;

        tracing::info!(callback = %self.callback, "Subscriber stopped");
        Ok(())
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.cancel.cancel();
        }
    }
}
