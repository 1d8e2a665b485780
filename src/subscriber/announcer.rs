//! Registration announcer
//!
//! Soft-state registration: the subscriber re-sends a register request for
//! every interest each interval, whether or not it was ACKed. This repairs
//! registrations lost to packet loss or a publisher restart.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::interest::InterestSet;
use crate::protocol::{codec, ContentType, ControlRequest, Endpoint, RequestKind};
use crate::stats::SubscriberCounters;
use crate::transport::DatagramSender;

/// Send one control request per content type
///
/// A failed send is logged and the remaining types are still attempted.
/// Returns the number of requests sent.
pub(crate) async fn send_requests<S: DatagramSender>(
    sender: &S,
    publisher: SocketAddr,
    kind: RequestKind,
    types: &[ContentType],
    callback: Endpoint,
    counters: &SubscriberCounters,
) -> usize {
    let mut sent = 0;

    for &content_type in types {
        let request = ControlRequest {
            kind: kind.clone(),
            content_type,
            callback,
        };
        let bytes = match codec::encode_request(&request) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(shape = %content_type, error = %e, "Cannot encode request");
                continue;
            }
        };

        match sender.send_to(&bytes, publisher).await {
            Ok(_) => {
                sent += 1;
                match kind {
                    RequestKind::Unregister => counters.unregistration_sent(),
                    _ => counters.registration_sent(),
                }
            }
            Err(e) => {
                tracing::error!(
                    request = %kind,
                    shape = %content_type,
                    publisher = %publisher,
                    error = %e,
                    "Failed to send request"
                );
            }
        }
    }

    sent
}

pub(crate) struct Announcer<S: DatagramSender> {
    pub(crate) sender: Arc<S>,
    pub(crate) publisher: SocketAddr,
    pub(crate) callback: Endpoint,
    pub(crate) interests: Arc<Mutex<InterestSet>>,
    pub(crate) counters: Arc<SubscriberCounters>,
    pub(crate) interval: Duration,
}

impl<S: DatagramSender> Announcer<S> {
    /// Announce loop; first announcement is immediate
    pub(crate) async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            // Hold the lock across the sends so a concurrent unsubscribe
            // cannot interleave with this snapshot
            let interests = self.interests.lock().await;
            let sent = send_requests(
                self.sender.as_ref(),
                self.publisher,
                RequestKind::Register,
                interests.as_slice(),
                self.callback,
                &self.counters,
            )
            .await;

            tracing::debug!(
                shapes = ?interests.as_slice(),
                sent,
                "Sent register requests"
            );
        }

        tracing::debug!("Announcer stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;
    use crate::protocol::codec::decode_request;
    use crate::transport::testing::RecordingSender;

    fn publisher() -> SocketAddr {
        "239.255.0.1:4545".parse().unwrap()
    }

    fn callback() -> Endpoint {
        Endpoint::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)), 1001)
    }

    fn decoded(sender: &RecordingSender) -> Vec<ControlRequest> {
        sender
            .sent()
            .iter()
            .map(|(_, bytes)| decode_request(bytes).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_send_one_request_per_type() {
        let sender = RecordingSender::default();
        let counters = SubscriberCounters::new();

        let sent = send_requests(
            &sender,
            publisher(),
            RequestKind::Register,
            &[ContentType::SQUARE, ContentType::CIRCLE],
            callback(),
            &counters,
        )
        .await;

        assert_eq!(sent, 2);
        assert_eq!(
            decoded(&sender),
            vec![
                ControlRequest::register(ContentType::SQUARE, callback()),
                ControlRequest::register(ContentType::CIRCLE, callback()),
            ]
        );
        assert!(sender.sent().iter().all(|(to, _)| *to == publisher()));
        assert_eq!(counters.snapshot().registrations_sent, 2);
    }

    #[tokio::test]
    async fn test_send_failure_is_counted_not_raised() {
        let sender = RecordingSender::failing_for([publisher()]);
        let counters = SubscriberCounters::new();

        let sent = send_requests(
            &sender,
            publisher(),
            RequestKind::Unregister,
            &[ContentType::TRIANGLE],
            callback(),
            &counters,
        )
        .await;

        assert_eq!(sent, 0);
        assert_eq!(counters.snapshot().unregistrations_sent, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_announcer_repeats_current_interests() {
        let sender = Arc::new(RecordingSender::default());
        let interests = Arc::new(Mutex::new(
            [ContentType::SQUARE].into_iter().collect::<InterestSet>(),
        ));
        let cancel = CancellationToken::new();

        let announcer = Announcer {
            sender: Arc::clone(&sender),
            publisher: publisher(),
            callback: callback(),
            interests: Arc::clone(&interests),
            counters: Arc::new(SubscriberCounters::new()),
            interval: Duration::from_secs(10),
        };
        let handle = tokio::spawn(announcer.run(cancel.clone()));

        // t=0 announces SQUARE
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(decoded(&sender).len(), 1);

        interests.lock().await.add(ContentType::CIRCLE);

        // t=10 announces SQUARE and CIRCLE
        tokio::time::sleep(Duration::from_secs(10)).await;
        let requests = decoded(&sender);
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].content_type, ContentType::CIRCLE);

        cancel.cancel();
        handle.await.unwrap();
    }
}
