use common::{ProductId, UserId};
use domain::{CartItem, CartSnapshot, DomainError};
use stock::StockOracle;

use crate::{CartError, Result, cache::CartCache, repository::CartRepository};

/// Cart store combining a repository, a cache-aside cache, and stock-gated
/// writes.
///
/// Reads go cache-first and populate the cache on miss. Every successful
/// write invalidates the user's cache entry, and only after the repository
/// write has committed.
#[derive(Debug, Clone)]
pub struct CartStore<R, S> {
    repository: R,
    cache: CartCache,
    stock: S,
}

impl<R, S> CartStore<R, S>
where
    R: CartRepository,
    S: StockOracle,
{
    /// Creates a cart store over the given repository and stock oracle.
    pub fn new(repository: R, stock: S) -> Self {
        Self {
            repository,
            cache: CartCache::new(),
            stock,
        }
    }

    /// Returns the cache, mainly for inspection in tests.
    pub fn cache(&self) -> &CartCache {
        &self.cache
    }

    /// Returns the user's cart, serving the item list from the cache when
    /// present and loading + caching it otherwise. The total is recomputed
    /// either way.
    #[tracing::instrument(skip(self))]
    pub async fn get_cart(&self, user_id: UserId) -> Result<CartSnapshot> {
        if let Some(items) = self.cache.get(user_id).await {
            return Ok(CartSnapshot::new(user_id, items));
        }

        let items = self.repository.list(user_id).await?;
        self.cache.put(user_id, items.clone()).await;
        Ok(CartSnapshot::new(user_id, items))
    }

    /// Returns the user's cart straight from the repository, refreshing the
    /// cache with what was read. Used where the latest committed rows
    /// matter more than cache hits, such as the checkout snapshot.
    #[tracing::instrument(skip(self))]
    pub async fn snapshot_fresh(&self, user_id: UserId) -> Result<CartSnapshot> {
        let items = self.repository.list(user_id).await?;
        self.cache.put(user_id, items.clone()).await;
        Ok(CartSnapshot::new(user_id, items))
    }

    /// Adds an item to the cart, merging quantities with any existing row
    /// for the same product.
    ///
    /// Stock is verified against the merged quantity (existing + requested).
    /// A merge that would leave the row outside its quantity bound is a
    /// validation failure; on insufficient stock the call fails without
    /// touching the repository row or the cache entry.
    ///
    /// Two concurrent calls for the same (user, product) can both observe
    /// the same existing row, both pass verification, and the later upsert
    /// wins. That lost-update window is accepted and left visible here.
    #[tracing::instrument(skip(self, item), fields(user_id = %item.user_id, product_id = %item.product_id))]
    pub async fn add_item(&self, item: CartItem) -> Result<CartSnapshot> {
        let merged_quantity = match self.repository.find(item.user_id, &item.product_id).await? {
            Some(row) => row
                .quantity
                .checked_add(item.quantity)
                .ok_or(DomainError::InvalidQuantity)?,
            None => item.quantity,
        };
        let row = CartItem::new(
            item.user_id,
            item.product_id,
            item.product_name,
            item.unit_price,
            merged_quantity,
        )?;

        if !self
            .stock
            .verify_stock(&row.product_id, merged_quantity)
            .await?
        {
            return Err(CartError::InsufficientStock {
                product_id: row.product_id,
                requested: merged_quantity,
            });
        }

        self.repository.upsert(&row).await?;
        self.cache.invalidate(row.user_id).await;

        self.snapshot_fresh(row.user_id).await
    }

    /// Decrements the row's quantity by one; a row reaching zero is
    /// deleted. A missing row is a not-found failure.
    #[tracing::instrument(skip(self))]
    pub async fn decrement_item(
        &self,
        user_id: UserId,
        product_id: &ProductId,
    ) -> Result<CartSnapshot> {
        let Some(existing) = self.repository.find(user_id, product_id).await? else {
            return Err(CartError::ItemNotFound(product_id.clone()));
        };

        if existing.quantity <= 1 {
            self.repository.delete(user_id, product_id).await?;
        } else {
            let row = CartItem::new(
                user_id,
                existing.product_id,
                existing.product_name,
                existing.unit_price,
                existing.quantity - 1,
            )?;
            self.repository.upsert(&row).await?;
        }
        self.cache.invalidate(user_id).await;

        self.snapshot_fresh(user_id).await
    }

    /// Deletes the row for (user, product). Removing an absent row is not
    /// an error.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: &ProductId,
    ) -> Result<CartSnapshot> {
        self.repository.delete(user_id, product_id).await?;
        self.cache.invalidate(user_id).await;

        self.snapshot_fresh(user_id).await
    }

    /// Deletes every row for the user.
    #[tracing::instrument(skip(self))]
    pub async fn clear_cart(&self, user_id: UserId) -> Result<()> {
        let removed = self.repository.clear(user_id).await?;
        self.cache.invalidate(user_id).await;
        tracing::debug!(%user_id, removed, "cart cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;
    use domain::MAX_QUANTITY;
    use stock::InMemoryStockOracle;

    use crate::memory::InMemoryCartRepository;

    fn setup() -> (
        CartStore<InMemoryCartRepository, InMemoryStockOracle>,
        InMemoryCartRepository,
        InMemoryStockOracle,
        UserId,
    ) {
        let repository = InMemoryCartRepository::new();
        let stock = InMemoryStockOracle::new();
        let store = CartStore::new(repository.clone(), stock.clone());
        (store, repository, stock, UserId::new())
    }

    fn widget(user_id: UserId, quantity: u32) -> CartItem {
        CartItem::new(user_id, "SKU-001", "Widget", Money::from_cents(1000), quantity).unwrap()
    }

    #[tokio::test]
    async fn test_get_cart_populates_cache_on_miss() {
        let (store, repository, stock, user_id) = setup();
        stock.set_level("SKU-001", 10);
        repository.upsert(&widget(user_id, 2)).await.unwrap();

        let first = store.get_cart(user_id).await.unwrap();
        assert_eq!(first.item_count(), 1);
        assert_eq!(repository.list_call_count().await, 1);

        // Second read is served from the cache.
        let second = store.get_cart(user_id).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(repository.list_call_count().await, 1);
    }

    #[tokio::test]
    async fn test_add_item_merges_quantities() {
        let (store, repository, stock, user_id) = setup();
        stock.set_level("SKU-001", 5);

        store.add_item(widget(user_id, 2)).await.unwrap();
        let cart = store.add_item(widget(user_id, 3)).await.unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.total(), Money::from_cents(5000));
        assert_eq!(repository.row_count().await, 1);
    }

    #[tokio::test]
    async fn test_add_item_verifies_merged_quantity() {
        let (store, _, stock, user_id) = setup();
        stock.set_level("SKU-001", 5);
        store.add_item(widget(user_id, 3)).await.unwrap();

        // 3 already in the cart, adding 3 means verifying 6 against 5.
        let err = store.add_item(widget(user_id, 3)).await.unwrap_err();
        assert!(matches!(
            err,
            CartError::InsufficientStock { requested: 6, .. }
        ));
    }

    #[tokio::test]
    async fn test_add_item_merge_overflow_is_rejected() {
        let (store, repository, stock, user_id) = setup();
        stock.set_level("SKU-001", u32::MAX);

        // Row written around the store, past the construction bounds.
        let oversized = CartItem {
            user_id,
            product_id: "SKU-001".into(),
            product_name: "Widget".to_string(),
            unit_price: Money::from_cents(1000),
            quantity: u32::MAX,
        };
        repository.upsert(&oversized).await.unwrap();

        let err = store.add_item(widget(user_id, 2)).await.unwrap_err();
        assert!(matches!(err, CartError::Domain(DomainError::InvalidQuantity)));

        // Rejected before the stock gate, row left as it was.
        assert_eq!(stock.verify_call_count(), 0);
        let row = repository.find(user_id, &"SKU-001".into()).await.unwrap();
        assert_eq!(row.unwrap().quantity, u32::MAX);
    }

    #[tokio::test]
    async fn test_add_item_merge_beyond_quantity_bound_is_rejected() {
        let (store, repository, stock, user_id) = setup();
        stock.set_level("SKU-001", u32::MAX);
        store.add_item(widget(user_id, MAX_QUANTITY)).await.unwrap();

        let err = store.add_item(widget(user_id, 1)).await.unwrap_err();
        assert!(matches!(err, CartError::Domain(DomainError::InvalidQuantity)));

        let row = repository.find(user_id, &"SKU-001".into()).await.unwrap();
        assert_eq!(row.unwrap().quantity, MAX_QUANTITY);
    }

    #[tokio::test]
    async fn test_failed_add_leaves_row_and_cache_untouched() {
        let (store, repository, stock, user_id) = setup();
        stock.set_level("SKU-001", 4);
        store.add_item(widget(user_id, 2)).await.unwrap();

        // Prime the cache, then fail an add.
        store.get_cart(user_id).await.unwrap();
        let list_calls = repository.list_call_count().await;

        let err = store.add_item(widget(user_id, 3)).await.unwrap_err();
        assert!(matches!(err, CartError::InsufficientStock { .. }));

        // Row unchanged, cache entry still present and still served.
        let row = repository.find(user_id, &"SKU-001".into()).await.unwrap();
        assert_eq!(row.unwrap().quantity, 2);
        assert!(store.cache().contains(user_id).await);

        let cart = store.get_cart(user_id).await.unwrap();
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(repository.list_call_count().await, list_calls);
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_stock_error() {
        let (store, repository, _, user_id) = setup();

        let err = store.add_item(widget(user_id, 1)).await.unwrap_err();
        assert!(matches!(
            err,
            CartError::Stock(stock::StockError::ProductNotFound(_))
        ));
        assert_eq!(repository.row_count().await, 0);
    }

    #[tokio::test]
    async fn test_stock_upstream_failure_propagates() {
        let (store, _, stock, user_id) = setup();
        stock.set_level("SKU-001", 10);
        stock.set_fail_upstream(true);

        let err = store.add_item(widget(user_id, 1)).await.unwrap_err();
        assert!(matches!(
            err,
            CartError::Stock(stock::StockError::Upstream(_))
        ));
    }

    #[tokio::test]
    async fn test_successful_write_invalidates_stale_cache() {
        let (store, _, stock, user_id) = setup();
        stock.set_level("SKU-001", 10);
        store.add_item(widget(user_id, 1)).await.unwrap();

        // Cache the single-row cart, then write through the store.
        let before = store.get_cart(user_id).await.unwrap();
        assert_eq!(before.items[0].quantity, 1);

        store.add_item(widget(user_id, 2)).await.unwrap();

        let after = store.get_cart(user_id).await.unwrap();
        assert_eq!(after.items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_decrement_reduces_quantity() {
        let (store, _, stock, user_id) = setup();
        stock.set_level("SKU-001", 10);
        store.add_item(widget(user_id, 3)).await.unwrap();

        let cart = store
            .decrement_item(user_id, &"SKU-001".into())
            .await
            .unwrap();
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_decrement_removes_row_at_one() {
        let (store, repository, stock, user_id) = setup();
        stock.set_level("SKU-001", 10);
        store.add_item(widget(user_id, 1)).await.unwrap();

        let cart = store
            .decrement_item(user_id, &"SKU-001".into())
            .await
            .unwrap();
        assert!(cart.is_empty());
        assert_eq!(repository.row_count().await, 0);
    }

    #[tokio::test]
    async fn test_decrement_missing_item_is_not_found() {
        let (store, _, _, user_id) = setup();

        let err = store
            .decrement_item(user_id, &"SKU-404".into())
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_item_is_idempotent() {
        let (store, _, stock, user_id) = setup();
        stock.set_level("SKU-001", 10);
        store.add_item(widget(user_id, 2)).await.unwrap();

        let cart = store.remove_item(user_id, &"SKU-001".into()).await.unwrap();
        assert!(cart.is_empty());

        // Removing again is still fine.
        let cart = store.remove_item(user_id, &"SKU-001".into()).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_clear_cart() {
        let (store, repository, stock, user_id) = setup();
        stock.set_level("SKU-001", 10);
        stock.set_level("SKU-002", 10);
        store.add_item(widget(user_id, 2)).await.unwrap();
        store
            .add_item(
                CartItem::new(user_id, "SKU-002", "Gadget", Money::from_cents(500), 1).unwrap(),
            )
            .await
            .unwrap();

        store.clear_cart(user_id).await.unwrap();

        assert_eq!(repository.row_count().await, 0);
        assert!(!store.cache().contains(user_id).await);
        assert!(store.get_cart(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_fresh_bypasses_stale_cache() {
        let (store, repository, stock, user_id) = setup();
        stock.set_level("SKU-001", 10);
        store.add_item(widget(user_id, 1)).await.unwrap();

        // Cache the current cart, then write behind the store's back.
        store.get_cart(user_id).await.unwrap();
        repository.upsert(&widget(user_id, 7)).await.unwrap();

        let cached = store.get_cart(user_id).await.unwrap();
        assert_eq!(cached.items[0].quantity, 1);

        let fresh = store.snapshot_fresh(user_id).await.unwrap();
        assert_eq!(fresh.items[0].quantity, 7);

        // The fresh read also repaired the cache.
        let repaired = store.get_cart(user_id).await.unwrap();
        assert_eq!(repaired.items[0].quantity, 7);
    }
}
