use async_trait::async_trait;

use common::{ProductId, UserId};
use domain::CartItem;

use crate::Result;

/// Persistence boundary for cart rows.
///
/// Rows are unique per (user, product); `upsert` writes the absolute
/// quantity for that key. Callers own all merge and stock logic.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Returns the row for (user, product), if any.
    async fn find(&self, user_id: UserId, product_id: &ProductId) -> Result<Option<CartItem>>;

    /// Returns all rows for the user.
    async fn list(&self, user_id: UserId) -> Result<Vec<CartItem>>;

    /// Inserts or replaces the row for the item's (user, product) key.
    async fn upsert(&self, item: &CartItem) -> Result<()>;

    /// Deletes the row for (user, product). Returns true if a row existed.
    async fn delete(&self, user_id: UserId, product_id: &ProductId) -> Result<bool>;

    /// Deletes all rows for the user and returns how many were removed.
    async fn clear(&self, user_id: UserId) -> Result<u64>;
}
