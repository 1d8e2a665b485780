//! Publisher side
//!
//! ```text
//!  control socket ──► RegistrationReceiver ──► SubscriptionRegistry
//!        ▲                    │                        │
//!        │                    └──► ACK socket ──► subscriber
//!        │                                             │
//!   subscribers            run_job (one per PublishJob) ◄┘
//!                                 │
//!                                 └──► control socket ──► each endpoint
//! ```

pub mod config;
mod receiver;
pub mod scheduler;
pub mod server;

pub use config::{PublishJob, PublisherConfig};
pub use scheduler::FanOutReport;
pub use server::Publisher;
