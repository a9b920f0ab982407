use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use common::UserId;
use domain::CartItem;

/// In-process cache of cart item lists, keyed by user.
///
/// Holds only the raw item lists; totals are recomputed by whoever builds
/// a snapshot from an entry. Writers must invalidate only after their
/// repository write has committed.
#[derive(Debug, Clone, Default)]
pub struct CartCache {
    entries: Arc<RwLock<HashMap<UserId, Vec<CartItem>>>>,
}

impl CartCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached item list for the user, if present.
    pub async fn get(&self, user_id: UserId) -> Option<Vec<CartItem>> {
        let entries = self.entries.read().await;
        match entries.get(&user_id) {
            Some(items) => {
                metrics::counter!("cart_cache_hits_total").increment(1);
                Some(items.clone())
            }
            None => {
                metrics::counter!("cart_cache_misses_total").increment(1);
                None
            }
        }
    }

    /// Stores the item list for the user, replacing any previous entry.
    pub async fn put(&self, user_id: UserId, items: Vec<CartItem>) {
        self.entries.write().await.insert(user_id, items);
    }

    /// Drops the entry for the user, if any.
    pub async fn invalidate(&self, user_id: UserId) {
        if self.entries.write().await.remove(&user_id).is_some() {
            tracing::debug!(%user_id, "cart cache entry invalidated");
        }
    }

    /// Returns true if an entry exists for the user.
    pub async fn contains(&self, user_id: UserId) -> bool {
        self.entries.read().await.contains_key(&user_id)
    }

    /// Returns the number of cached entries.
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;

    fn items(user_id: UserId) -> Vec<CartItem> {
        vec![CartItem::new(user_id, "SKU-001", "Widget", Money::from_cents(100), 1).unwrap()]
    }

    #[tokio::test]
    async fn get_returns_none_until_put() {
        let cache = CartCache::new();
        let user_id = UserId::new();

        assert!(cache.get(user_id).await.is_none());

        cache.put(user_id, items(user_id)).await;
        assert_eq!(cache.get(user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalidate_drops_only_that_user() {
        let cache = CartCache::new();
        let user_a = UserId::new();
        let user_b = UserId::new();

        cache.put(user_a, items(user_a)).await;
        cache.put(user_b, items(user_b)).await;

        cache.invalidate(user_a).await;
        assert!(!cache.contains(user_a).await);
        assert!(cache.contains(user_b).await);
        assert_eq!(cache.entry_count().await, 1);
    }
}
