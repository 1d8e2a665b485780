//! Subscription registry for pub/sub routing
//!
//! The registry records which subscriber endpoints want which content
//! types. The registration receiver writes it; fan-out jobs read it and
//! prune endpoints whose delivery failed.
//!
//! # Architecture
//!
//! ```text
//!                       Arc<SubscriptionRegistry>
//!                     ┌───────────────────────────┐
//!                     │ subscribers: HashMap<      │
//!                     │   ContentType,             │
//!                     │   HashSet<Endpoint>,       │
//!                     │ >                          │
//!                     └─────────────┬─────────────┘
//!                                   │
//!           ┌───────────────────────┼───────────────────────┐
//!           │                       │                       │
//!           ▼                       ▼                       ▼
//!   [Registration receiver]   [Fan-out job A]         [Fan-out job B]
//!   register()/unregister()   endpoints()/evict()     endpoints()/evict()
//! ```
//!
//! There is no expiry. An endpoint stays until it unregisters or a send to
//! it fails.

pub mod store;

pub use store::SubscriptionRegistry;
