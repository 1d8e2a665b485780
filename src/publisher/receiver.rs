//! Registration receiver
//!
//! Reads register/unregister requests from the control socket, applies them
//! to the registry and answers each with an ACK.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

use crate::protocol::codec;
use crate::protocol::constants::{ACK_MARKER, MAX_DATAGRAM_SIZE};
use crate::protocol::RequestKind;
use crate::registry::SubscriptionRegistry;
use crate::stats::PublisherCounters;
use crate::transport::DatagramSender;

pub(crate) struct RegistrationReceiver<A: DatagramSender> {
    registry: Arc<SubscriptionRegistry>,
    ack_sender: Arc<A>,
    counters: Arc<PublisherCounters>,
}

impl<A: DatagramSender> RegistrationReceiver<A> {
    pub(crate) fn new(
        registry: Arc<SubscriptionRegistry>,
        ack_sender: Arc<A>,
        counters: Arc<PublisherCounters>,
    ) -> Self {
        Self {
            registry,
            ack_sender,
            counters,
        }
    }

    /// Receive loop; returns only when `cancel` fires
    pub(crate) async fn run(self, socket: Arc<UdpSocket>, cancel: CancellationToken) {
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];

        loop {
            let (len, source) = tokio::select! {
                _ = cancel.cancelled() => break,
                result = socket.recv_from(&mut buf) => match result {
                    Ok(received) => received,
                    Err(e) => {
                        // Includes ECONNRESET from a subscriber that went away
                        tracing::warn!(error = %e, "Control receive failed");
                        continue;
                    }
                },
            };

            self.handle_datagram(&buf[..len], source).await;
        }

        tracing::debug!("Registration receiver stopped");
    }

    /// Apply one control datagram and ACK it
    pub(crate) async fn handle_datagram(&self, data: &[u8], source: SocketAddr) {
        let request = match codec::decode_request(data) {
            Ok(request) => request,
            Err(e) => {
                self.counters.request_dropped();
                tracing::warn!(peer = %source, error = %e, "Dropping malformed control request");
                return;
            }
        };
        self.counters.request_received();

        match &request.kind {
            RequestKind::Register => {
                self.registry
                    .register(request.content_type, request.callback)
                    .await;
            }
            RequestKind::Unregister => {
                self.registry
                    .unregister(request.content_type, request.callback)
                    .await;
            }
            RequestKind::Other(tag) => {
                tracing::error!(
                    peer = %source,
                    request = %tag,
                    "Invalid request tag"
                );
            }
        }

        // The ACK says "message processed", not "membership changed"
        let target = request.callback.socket_addr();
        match self.ack_sender.send_to(ACK_MARKER, target).await {
            Ok(_) => self.counters.ack_sent(),
            Err(e) => {
                tracing::warn!(endpoint = %target, error = %e, "Failed to send ACK");
            }
        }
    }
}
