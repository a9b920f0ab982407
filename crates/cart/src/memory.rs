use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{ProductId, UserId};
use domain::CartItem;

use crate::{Result, repository::CartRepository};

#[derive(Debug, Default)]
struct InMemoryCartState {
    rows: HashMap<UserId, Vec<CartItem>>,
    list_calls: u32,
}

/// In-memory cart repository for testing and default wiring.
///
/// Rows keep their insertion order; an upsert of an existing key replaces
/// the row in place.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartRepository {
    state: Arc<RwLock<InMemoryCartState>>,
}

impl InMemoryCartRepository {
    /// Creates a new empty in-memory cart repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of rows across all users.
    pub async fn row_count(&self) -> usize {
        self.state.read().await.rows.values().map(Vec::len).sum()
    }

    /// Returns how many times `list` has been called.
    pub async fn list_call_count(&self) -> u32 {
        self.state.read().await.list_calls
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn find(&self, user_id: UserId, product_id: &ProductId) -> Result<Option<CartItem>> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .get(&user_id)
            .and_then(|rows| rows.iter().find(|row| &row.product_id == product_id))
            .cloned())
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<CartItem>> {
        let mut state = self.state.write().await;
        state.list_calls += 1;
        Ok(state.rows.get(&user_id).cloned().unwrap_or_default())
    }

    async fn upsert(&self, item: &CartItem) -> Result<()> {
        let mut state = self.state.write().await;
        let rows = state.rows.entry(item.user_id).or_default();

        match rows.iter_mut().find(|row| row.product_id == item.product_id) {
            Some(row) => *row = item.clone(),
            None => rows.push(item.clone()),
        }
        Ok(())
    }

    async fn delete(&self, user_id: UserId, product_id: &ProductId) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(rows) = state.rows.get_mut(&user_id) else {
            return Ok(false);
        };

        let before = rows.len();
        rows.retain(|row| &row.product_id != product_id);
        Ok(rows.len() < before)
    }

    async fn clear(&self, user_id: UserId) -> Result<u64> {
        let mut state = self.state.write().await;
        let removed = state.rows.remove(&user_id).map_or(0, |rows| rows.len());
        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;

    fn item(user_id: UserId, product: &str, quantity: u32) -> CartItem {
        CartItem::new(user_id, product, "Widget", Money::from_cents(500), quantity).unwrap()
    }

    #[tokio::test]
    async fn upsert_replaces_existing_row() {
        let repo = InMemoryCartRepository::new();
        let user_id = UserId::new();

        repo.upsert(&item(user_id, "SKU-001", 2)).await.unwrap();
        repo.upsert(&item(user_id, "SKU-001", 5)).await.unwrap();

        let found = repo.find(user_id, &"SKU-001".into()).await.unwrap();
        assert_eq!(found.unwrap().quantity, 5);
        assert_eq!(repo.row_count().await, 1);
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let repo = InMemoryCartRepository::new();
        let user_id = UserId::new();

        repo.upsert(&item(user_id, "SKU-002", 1)).await.unwrap();
        repo.upsert(&item(user_id, "SKU-001", 1)).await.unwrap();

        let rows = repo.list(user_id).await.unwrap();
        assert_eq!(rows[0].product_id.as_str(), "SKU-002");
        assert_eq!(rows[1].product_id.as_str(), "SKU-001");
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let repo = InMemoryCartRepository::new();
        let user_id = UserId::new();
        repo.upsert(&item(user_id, "SKU-001", 1)).await.unwrap();

        assert!(repo.delete(user_id, &"SKU-001".into()).await.unwrap());
        assert!(!repo.delete(user_id, &"SKU-001".into()).await.unwrap());
    }

    #[tokio::test]
    async fn clear_removes_only_that_user() {
        let repo = InMemoryCartRepository::new();
        let user_a = UserId::new();
        let user_b = UserId::new();

        repo.upsert(&item(user_a, "SKU-001", 1)).await.unwrap();
        repo.upsert(&item(user_a, "SKU-002", 1)).await.unwrap();
        repo.upsert(&item(user_b, "SKU-001", 1)).await.unwrap();

        assert_eq!(repo.clear(user_a).await.unwrap(), 2);
        assert_eq!(repo.row_count().await, 1);
    }
}
