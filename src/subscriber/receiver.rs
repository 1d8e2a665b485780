//! Notification and liveness receiver
//!
//! Reads the subscriber's unicast socket. ACKs feed the liveness tracker;
//! everything else is decoded, turned into a shape and delivered.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::event::SubscriberEvent;
use super::liveness::LivenessTracker;
use crate::protocol::codec;
use crate::protocol::constants::MAX_DATAGRAM_SIZE;
use crate::protocol::Inbound;
use crate::shape::ShapeFactory;
use crate::stats::SubscriberCounters;

pub(crate) struct NotificationReceiver {
    factory: Arc<ShapeFactory>,
    tracker: LivenessTracker,
    events: mpsc::Sender<SubscriberEvent>,
    counters: Arc<SubscriberCounters>,
}

impl NotificationReceiver {
    pub(crate) fn new(
        factory: Arc<ShapeFactory>,
        tracker: LivenessTracker,
        events: mpsc::Sender<SubscriberEvent>,
        counters: Arc<SubscriberCounters>,
    ) -> Self {
        Self {
            factory,
            tracker,
            events,
            counters,
        }
    }

    /// Receive loop
    ///
    /// Each wait is bounded by `poll_timeout` so liveness is swept even when
    /// nothing arrives; cancellation is observed immediately.
    pub(crate) async fn run(
        mut self,
        socket: Arc<UdpSocket>,
        poll_timeout: Duration,
        cancel: CancellationToken,
    ) {
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];

        loop {
            let received = tokio::select! {
                _ = cancel.cancelled() => break,
                result = tokio::time::timeout(poll_timeout, socket.recv_from(&mut buf)) => result,
            };

            match received {
                Ok(Ok((len, source))) => self.handle_datagram(&buf[..len], source, Instant::now()),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Receive failed");
                }
                Err(_) => {}
            }

            self.sweep(Instant::now());
        }

        tracing::debug!("Notification receiver stopped");
    }

    pub(crate) fn handle_datagram(&mut self, data: &[u8], source: SocketAddr, now: Instant) {
        match codec::decode_inbound(data) {
            Ok(Inbound::Ack) => {
                self.counters.ack_received();
                let message = String::from_utf8_lossy(data);
                if self.tracker.record_ack(source, &message, now) {
                    tracing::info!(publisher = %source, "Connection with publisher restored");
                }
                tracing::debug!(publisher = %source, "Received ACK");
                self.emit(SubscriberEvent::Ack { publisher: source });
            }
            Ok(Inbound::Notification(notification)) => {
                match self
                    .factory
                    .create(notification.content_type, &notification.params)
                {
                    Ok(shape) => {
                        self.counters.notification_received();
                        tracing::info!(
                            publisher = %source,
                            "Received shape: {}",
                            shape.describe()
                        );
                        self.emit(SubscriberEvent::Notification {
                            source,
                            content_type: notification.content_type,
                            shape,
                        });
                    }
                    Err(e) => {
                        self.counters.decode_error();
                        tracing::warn!(publisher = %source, error = %e, "Cannot build shape");
                    }
                }
            }
            Err(e) => {
                self.counters.decode_error();
                tracing::warn!(peer = %source, error = %e, "Dropping undecodable datagram");
            }
        }
    }

    pub(crate) fn sweep(&mut self, now: Instant) {
        for publisher in self.tracker.sweep(now) {
            self.counters.publisher_lost();
            tracing::error!(publisher = %publisher, "Connection with publisher lost");
            self.emit(SubscriberEvent::PublisherLost { publisher });
        }
    }

    fn emit(&self, event: SubscriberEvent) {
        // Never block the receive loop on a slow or absent consumer
        if let Err(e) = self.events.try_send(event) {
            tracing::trace!(error = %e, "Event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::protocol::ContentType;

    fn receiver() -> (NotificationReceiver, mpsc::Receiver<SubscriberEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let receiver = NotificationReceiver::new(
            Arc::new(ShapeFactory::new()),
            LivenessTracker::new(Duration::from_secs(10), 3),
            tx,
            Arc::new(SubscriberCounters::new()),
        );
        (receiver, rx)
    }

    fn publisher() -> SocketAddr {
        "127.0.0.1:4545".parse().unwrap()
    }

    #[tokio::test]
    async fn test_notification_is_delivered() {
        let (mut receiver, mut events) = receiver();
        let data = codec::encode(ContentType::SQUARE, &[json!(4), json!(4), json!("green")]).unwrap();

        receiver.handle_datagram(&data, publisher(), Instant::now());

        match events.try_recv().unwrap() {
            SubscriberEvent::Notification {
                content_type,
                shape,
                source,
            } => {
                assert_eq!(content_type, ContentType::SQUARE);
                assert_eq!(source, publisher());
                assert_eq!(
                    shape.describe(),
                    "shape: Square, Height: 4, Length: 4, Color: green"
                );
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(receiver.counters.snapshot().notifications_received, 1);
    }

    #[tokio::test]
    async fn test_ack_is_tracked() {
        let (mut receiver, mut events) = receiver();

        receiver.handle_datagram(b"ACK", publisher(), Instant::now());

        assert!(matches!(
            events.try_recv().unwrap(),
            SubscriberEvent::Ack { publisher: p } if p == publisher()
        ));
        let record = receiver.tracker.get(&publisher()).unwrap();
        assert_eq!(record.miss_count, 0);
        assert_eq!(record.last_message, "ACK");
    }

    #[tokio::test]
    async fn test_bad_datagrams_are_dropped() {
        let (mut receiver, mut events) = receiver();
        let unknown = codec::encode(ContentType::new(99), &[]).unwrap();
        let wrong_arity = codec::encode(ContentType::CIRCLE, &[json!(5)]).unwrap();

        receiver.handle_datagram(b"\xff\xfe", publisher(), Instant::now());
        receiver.handle_datagram(&unknown, publisher(), Instant::now());
        receiver.handle_datagram(&wrong_arity, publisher(), Instant::now());

        assert!(events.try_recv().is_err());
        assert_eq!(receiver.counters.snapshot().decode_errors, 3);
    }

    #[tokio::test]
    async fn test_silent_publisher_reported_lost() {
        let (mut receiver, mut events) = receiver();
        let t0 = Instant::now();

        receiver.handle_datagram(b"ACK", publisher(), t0);
        let _ = events.try_recv();

        receiver.sweep(t0 + Duration::from_secs(31));
        assert!(matches!(
            events.try_recv().unwrap(),
            SubscriberEvent::PublisherLost { publisher: p } if p == publisher()
        ));

        // Reported once
        receiver.sweep(t0 + Duration::from_secs(60));
        assert!(events.try_recv().is_err());
        assert_eq!(receiver.counters.snapshot().publishers_lost, 1);
    }

    #[tokio::test]
    async fn test_full_channel_does_not_block() {
        let (tx, _rx) = mpsc::channel(1);
        let mut receiver = NotificationReceiver::new(
            Arc::new(ShapeFactory::new()),
            LivenessTracker::new(Duration::from_secs(10), 3),
            tx,
            Arc::new(SubscriberCounters::new()),
        );

        for _ in 0..5 {
            receiver.handle_datagram(b"ACK", publisher(), Instant::now());
        }
        assert_eq!(receiver.counters.snapshot().acks_received, 5);
    }
}
