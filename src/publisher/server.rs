//! Publisher
//!
//! Owns the control socket, the ACK socket and the subscription registry,
//! and runs the registration receiver plus one fan-out task per job.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::config::{PublishJob, PublisherConfig};
use super::receiver::RegistrationReceiver;
use super::scheduler;
use crate::api::ShapePublisher;
use crate::error::{Result, StateError};
use crate::protocol::{codec, ContentType, Endpoint};
use crate::registry::SubscriptionRegistry;
use crate::shutdown::join_bounded;
use crate::stats::{PublisherCounters, PublisherStats};
use crate::transport::{bind_alongside, bind_control};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Receiving registrations, not yet publishing
    Receiving,
    Publishing,
    Stopped,
}

/// Multicast shape publisher
///
/// # Example
/// ```no_run
/// use serde_json::json;
/// use shape_pubsub::protocol::ContentType;
/// use shape_pubsub::publisher::{PublishJob, Publisher, PublisherConfig};
///
/// # async fn example() -> shape_pubsub::error::Result<()> {
/// let jobs = vec![
///     PublishJob::every_secs(ContentType::SQUARE, 1, vec![json!(4), json!(4), json!("green")]),
///     PublishJob::every_secs(ContentType::CIRCLE, 2, vec![json!(5), json!("blue")]),
/// ];
/// let mut publisher = Publisher::bind(PublisherConfig::with_port(4545), jobs).await?;
/// publisher.publish()?;
///
/// tokio::time::sleep(std::time::Duration::from_secs(100)).await;
/// publisher.stop().await?;
/// # Ok(())
/// # }
/// ```
pub struct Publisher {
    config: PublisherConfig,
    jobs: Vec<PublishJob>,
    registry: Arc<SubscriptionRegistry>,
    /// Control socket; also the source of fan-out datagrams
    socket: Arc<UdpSocket>,
    counters: Arc<PublisherCounters>,
    shutdown: CancellationToken,
    receiver_task: Option<JoinHandle<()>>,
    job_tasks: Vec<JoinHandle<()>>,
    phase: Phase,
}

impl Publisher {
    /// Bind the sockets and start accepting registrations
    ///
    /// Publishing does not begin until [`publish`](Self::publish).
    pub async fn bind(config: PublisherConfig, jobs: Vec<PublishJob>) -> Result<Self> {
        let socket = bind_control(config.bind_addr, config.multicast_group)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    addr = %config.bind_addr,
                    group = ?config.multicast_group,
                    error = %e,
                    "Failed to set up control socket"
                );
            })?;
        let socket = Arc::new(socket);
        let ack_socket = Arc::new(bind_alongside(socket.local_addr()?).await?);

        let registry = Arc::new(SubscriptionRegistry::new());
        let counters = Arc::new(PublisherCounters::new());
        let shutdown = CancellationToken::new();

        let receiver = RegistrationReceiver::new(
            Arc::clone(&registry),
            ack_socket,
            Arc::clone(&counters),
        );
        let receiver_task = tokio::spawn(receiver.run(Arc::clone(&socket), shutdown.clone()));

        tracing::info!(
            addr = %socket.local_addr()?,
            group = ?config.multicast_group,
            jobs = jobs.len(),
            "Publisher listening for registrations"
        );

        Ok(Self {
            config,
            jobs,
            registry,
            socket,
            counters,
            shutdown,
            receiver_task: Some(receiver_task),
            job_tasks: Vec::new(),
            phase: Phase::Receiving,
        })
    }

    /// Start one fan-out task per configured job
    pub fn publish(&mut self) -> Result<()> {
        match self.phase {
            Phase::Receiving => {}
            Phase::Publishing => return Err(StateError::AlreadyRunning.into()),
            Phase::Stopped => return Err(StateError::Stopped.into()),
        }

        for job in &self.jobs {
            self.job_tasks.push(tokio::spawn(scheduler::run_job(
                job.clone(),
                Arc::clone(&self.registry),
                Arc::clone(&self.socket),
                Arc::clone(&self.counters),
                self.shutdown.child_token(),
            )));
        }

        self.phase = Phase::Publishing;
        tracing::debug!(jobs = self.jobs.len(), "Publisher starting to publish");
        Ok(())
    }

    /// Stop publishing and receiving
    ///
    /// In-flight ticks finish; every task is joined within
    /// `shutdown_timeout` and aborted after it.
    pub async fn stop(&mut self) -> Result<()> {
        if self.phase == Phase::Stopped {
            return Err(StateError::Stopped.into());
        }
        self.phase = Phase::Stopped;
        self.shutdown.cancel();

        let mut handles: Vec<_> = self.job_tasks.drain(..).collect();
        handles.extend(self.receiver_task.take());
        join_bounded("publisher", handles, self.config.shutdown_timeout).await;

        tracing::debug!("Stopped publishing");
        Ok(())
    }

    /// Whether fan-out jobs are running
    pub fn is_publishing(&self) -> bool {
        self.phase == Phase::Publishing
    }

    /// Address of the control socket
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// The subscription registry
    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }

    /// Configured jobs
    pub fn jobs(&self) -> &[PublishJob] {
        &self.jobs
    }

    pub fn stats(&self) -> PublisherStats {
        self.counters.snapshot()
    }
}

impl ShapePublisher for Publisher {
    async fn register(&self, content_type: ContentType, endpoint: Endpoint) -> bool {
        self.registry.register(content_type, endpoint).await
    }

    async fn unregister(&self, content_type: ContentType, endpoint: Endpoint) -> bool {
        self.registry.unregister(content_type, endpoint).await
    }

    async fn notify(&self, content_type: ContentType, params: &[Value]) -> usize {
        let payload = match codec::encode(content_type, params) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(shape = %content_type, error = %e, "Cannot encode notification");
                return 0;
            }
        };

        scheduler::fan_out(
            &self.registry,
            self.socket.as_ref(),
            &self.counters,
            content_type,
            &payload,
        )
        .await
        .delivered
    }
}

impl Drop for Publisher {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
