//! Fan-out scheduler
//!
//! One task per [`PublishJob`]. Each tick sends the job's encoded
//! notification to every endpoint registered for its content type and evicts
//! any endpoint whose send fails. There is no retry: a pruned subscriber
//! comes back through its own periodic re-registration.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::config::PublishJob;
use crate::protocol::{codec, ContentType, Endpoint};
use crate::registry::SubscriptionRegistry;
use crate::stats::PublisherCounters;
use crate::transport::DatagramSender;

/// Result of one fan-out pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutReport {
    /// Endpoints the notification was sent to
    pub delivered: usize,
    /// Endpoints removed because their send failed
    pub evicted: Vec<Endpoint>,
}

/// Send `payload` to every endpoint registered for `content_type`
pub(crate) async fn fan_out<S: DatagramSender>(
    registry: &SubscriptionRegistry,
    sender: &S,
    counters: &PublisherCounters,
    content_type: ContentType,
    payload: &Bytes,
) -> FanOutReport {
    let endpoints = registry.endpoints(content_type).await;
    let mut report = FanOutReport::default();

    if endpoints.is_empty() {
        return report;
    }

    for endpoint in endpoints {
        match sender.send_to(payload, endpoint.socket_addr()).await {
            Ok(_) => report.delivered += 1,
            Err(e) => {
                tracing::error!(
                    shape = %content_type,
                    endpoint = %endpoint,
                    error = %e,
                    "Error sending notification"
                );
                if registry.evict(content_type, endpoint).await {
                    counters.evicted();
                }
                report.evicted.push(endpoint);
            }
        }
    }

    counters.notifications_sent(report.delivered as u64);
    tracing::debug!(
        shape = %content_type,
        delivered = report.delivered,
        evicted = report.evicted.len(),
        "Fan-out tick"
    );

    report
}

/// Periodic task for one job; returns when `cancel` fires
///
/// A tick already in progress when cancellation arrives runs to completion.
pub(crate) async fn run_job<S: DatagramSender>(
    job: PublishJob,
    registry: Arc<SubscriptionRegistry>,
    sender: Arc<S>,
    counters: Arc<PublisherCounters>,
    cancel: CancellationToken,
) {
    let payload = match codec::encode(job.content_type, &job.params) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(shape = %job.content_type, error = %e, "Cannot encode job params");
            return;
        }
    };

    // interval() panics on a zero period
    let period = job.frequency.max(Duration::from_millis(1));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::debug!(
        shape = %job.content_type,
        period_ms = period.as_millis() as u64,
        "Publishing job started"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        fan_out(&registry, sender.as_ref(), &counters, job.content_type, &payload).await;
    }

    tracing::debug!(shape = %job.content_type, "Publishing job stopped");
}
