//! Subscription registry implementation
//!
//! The publisher's map of content type to subscriber endpoints.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::protocol::{ContentType, Endpoint};

/// Registry of subscriber endpoints per content type
///
/// Thread-safe via `RwLock`. The registration receiver is the only regular
/// writer; fan-out jobs take read snapshots and write only to evict.
pub struct SubscriptionRegistry {
    /// Map of content type to registered endpoints
    subscribers: RwLock<HashMap<ContentType, HashSet<Endpoint>>>,
}

impl SubscriptionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Add an endpoint for a content type
    ///
    /// Idempotent. Returns `true` if the endpoint was not already present.
    pub async fn register(&self, content_type: ContentType, endpoint: Endpoint) -> bool {
        let mut subscribers = self.subscribers.write().await;
        let added = subscribers
            .entry(content_type)
            .or_default()
            .insert(endpoint);

        if added {
            tracing::info!(
                shape = %content_type,
                endpoint = %endpoint,
                "Subscriber registered"
            );
        } else {
            tracing::debug!(
                shape = %content_type,
                endpoint = %endpoint,
                "Subscriber already registered"
            );
        }

        added
    }

    /// Remove an endpoint for a content type
    ///
    /// Idempotent. Returns `true` if the endpoint was present.
    pub async fn unregister(&self, content_type: ContentType, endpoint: Endpoint) -> bool {
        let removed = self.remove(content_type, endpoint).await;

        if removed {
            tracing::info!(
                shape = %content_type,
                endpoint = %endpoint,
                "Subscriber unregistered"
            );
        } else {
            tracing::debug!(
                shape = %content_type,
                endpoint = %endpoint,
                "Unregister for unknown subscriber"
            );
        }

        removed
    }

    /// Drop an endpoint after a failed delivery
    pub async fn evict(&self, content_type: ContentType, endpoint: Endpoint) -> bool {
        let removed = self.remove(content_type, endpoint).await;

        if removed {
            tracing::warn!(
                shape = %content_type,
                endpoint = %endpoint,
                "Subscriber evicted after failed delivery"
            );
        }

        removed
    }

    async fn remove(&self, content_type: ContentType, endpoint: Endpoint) -> bool {
        let mut subscribers = self.subscribers.write().await;

        let Some(endpoints) = subscribers.get_mut(&content_type) else {
            return false;
        };
        let removed = endpoints.remove(&endpoint);
        if endpoints.is_empty() {
            subscribers.remove(&content_type);
        }
        removed
    }

    /// Snapshot of the endpoints registered for a content type
    pub async fn endpoints(&self, content_type: ContentType) -> Vec<Endpoint> {
        self.subscribers
            .read()
            .await
            .get(&content_type)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Check whether an endpoint is registered for a content type
    pub async fn contains(&self, content_type: ContentType, endpoint: Endpoint) -> bool {
        self.subscribers
            .read()
            .await
            .get(&content_type)
            .is_some_and(|set| set.contains(&endpoint))
    }

    /// Number of endpoints registered for a content type
    pub async fn subscriber_count(&self, content_type: ContentType) -> usize {
        self.subscribers
            .read()
            .await
            .get(&content_type)
            .map_or(0, HashSet::len)
    }

    /// Content types with at least one registered endpoint
    pub async fn content_types(&self) -> Vec<ContentType> {
        let mut types: Vec<_> = self.subscribers.read().await.keys().copied().collect();
        types.sort();
        types
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;

    fn endpoint(port: u16) -> Endpoint {
        Endpoint::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let registry = SubscriptionRegistry::new();

        assert!(registry.register(ContentType::SQUARE, endpoint(1001)).await);
        assert!(!registry.register(ContentType::SQUARE, endpoint(1001)).await);

        assert_eq!(registry.subscriber_count(ContentType::SQUARE).await, 1);
        assert_eq!(
            registry.endpoints(ContentType::SQUARE).await,
            vec![endpoint(1001)]
        );
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let registry = SubscriptionRegistry::new();

        // Removing from an empty registry is not an error
        assert!(!registry.unregister(ContentType::CIRCLE, endpoint(1001)).await);

        registry.register(ContentType::CIRCLE, endpoint(1001)).await;
        assert!(registry.unregister(ContentType::CIRCLE, endpoint(1001)).await);
        assert!(!registry.unregister(ContentType::CIRCLE, endpoint(1001)).await);

        assert!(!registry.contains(ContentType::CIRCLE, endpoint(1001)).await);
        assert!(registry.content_types().await.is_empty());
    }

    #[tokio::test]
    async fn test_fold_matches_set_semantics() {
        // (register?, ...) applied left to right against one (type, endpoint) pair
        let sequences: &[&[bool]] = &[
            &[true, true, false],
            &[false, true, true],
            &[true, false, false, true],
            &[false, false],
            &[true, false, true, false, true],
        ];

        for ops in sequences {
            let registry = SubscriptionRegistry::new();
            let mut expected = false;

            for &is_register in ops.iter() {
                if is_register {
                    registry.register(ContentType::TRIANGLE, endpoint(9997)).await;
                } else {
                    registry.unregister(ContentType::TRIANGLE, endpoint(9997)).await;
                }
                expected = is_register;
            }

            assert_eq!(
                registry.contains(ContentType::TRIANGLE, endpoint(9997)).await,
                expected,
                "sequence {:?}",
                ops
            );
            assert!(registry.subscriber_count(ContentType::TRIANGLE).await <= 1);
        }
    }

    #[tokio::test]
    async fn test_types_are_independent() {
        let registry = SubscriptionRegistry::new();

        registry.register(ContentType::SQUARE, endpoint(1)).await;
        registry.register(ContentType::CIRCLE, endpoint(1)).await;
        registry.register(ContentType::CIRCLE, endpoint(2)).await;

        registry.unregister(ContentType::CIRCLE, endpoint(1)).await;

        assert!(registry.contains(ContentType::SQUARE, endpoint(1)).await);
        assert_eq!(
            registry.endpoints(ContentType::CIRCLE).await,
            vec![endpoint(2)]
        );
        assert_eq!(
            registry.content_types().await,
            vec![ContentType::CIRCLE, ContentType::SQUARE]
        );
    }

    #[tokio::test]
    async fn test_evict() {
        let registry = SubscriptionRegistry::new();

        registry.register(ContentType::SQUARE, endpoint(1)).await;
        assert!(registry.evict(ContentType::SQUARE, endpoint(1)).await);
        assert!(!registry.evict(ContentType::SQUARE, endpoint(1)).await);
        assert_eq!(registry.subscriber_count(ContentType::SQUARE).await, 0);
    }
}
