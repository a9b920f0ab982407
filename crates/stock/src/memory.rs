//! In-memory stock oracle.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use common::ProductId;

use crate::{StockError, StockOracle};

#[derive(Debug, Default)]
struct InMemoryStockState {
    levels: HashMap<ProductId, u32>,
    fail_upstream: bool,
    verify_calls: u32,
}

/// In-memory stock oracle for testing and default wiring.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStockOracle {
    state: Arc<RwLock<InMemoryStockState>>,
}

impl InMemoryStockOracle {
    /// Creates a new in-memory stock oracle with no known products.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the available quantity for a product.
    pub fn set_level(&self, product_id: impl Into<ProductId>, quantity: u32) {
        self.state
            .write()
            .unwrap()
            .levels
            .insert(product_id.into(), quantity);
    }

    /// Configures the oracle to fail upstream on every verify call.
    pub fn set_fail_upstream(&self, fail: bool) {
        self.state.write().unwrap().fail_upstream = fail;
    }

    /// Returns the number of verify calls made so far.
    pub fn verify_call_count(&self) -> u32 {
        self.state.read().unwrap().verify_calls
    }
}

#[async_trait]
impl StockOracle for InMemoryStockOracle {
    async fn verify_stock(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<bool, StockError> {
        let mut state = self.state.write().unwrap();
        state.verify_calls += 1;

        if state.fail_upstream {
            return Err(StockError::Upstream(
                "stock service unreachable".to_string(),
            ));
        }

        match state.levels.get(product_id) {
            None => Err(StockError::ProductNotFound(product_id.clone())),
            Some(&available) => Ok(available >= quantity),
        }
    }
}
