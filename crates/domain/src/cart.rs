//! Cart rows and the derived cart view.

use serde::{Deserialize, Serialize};

use common::{Money, ProductId, UserId};

use crate::error::DomainError;

/// Upper bound on a cart row's quantity, requested or merged.
pub const MAX_QUANTITY: u32 = 1_000_000;

/// Upper bound on a unit price ($10,000,000.00). Together with
/// [`MAX_QUANTITY`] this keeps every line total inside [`Money`]'s range.
pub const MAX_UNIT_PRICE: Money = Money::from_cents(1_000_000_000);

/// A single cart row, unique per (user, product).
///
/// A quantity reaching zero deletes the row; zero-quantity rows are never
/// constructed or persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Owner of the cart row.
    pub user_id: UserId,

    /// The product identifier.
    pub product_id: ProductId,

    /// Human-readable product name.
    pub product_name: String,

    /// Price per unit in cents.
    pub unit_price: Money,

    /// Quantity in the cart.
    pub quantity: u32,
}

impl CartItem {
    /// Creates a new cart row.
    ///
    /// Quantities must fall in `1..=MAX_QUANTITY` and unit prices must be
    /// positive and at most [`MAX_UNIT_PRICE`].
    pub fn new(
        user_id: UserId,
        product_id: impl Into<ProductId>,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Result<Self, DomainError> {
        if quantity == 0 || quantity > MAX_QUANTITY {
            return Err(DomainError::InvalidQuantity);
        }
        if !unit_price.is_positive() || unit_price > MAX_UNIT_PRICE {
            return Err(DomainError::InvalidUnitPrice(unit_price));
        }

        Ok(Self {
            user_id,
            product_id: product_id.into(),
            product_name: product_name.into(),
            unit_price,
            quantity,
        })
    }

    /// Returns the total price for this row (quantity * unit_price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Derived view of a user's cart at a point in time.
///
/// Only the item rows are ever stored or cached; the total is recomputed
/// from them on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Owner of the cart.
    pub user_id: UserId,

    /// The cart rows, in repository order.
    pub items: Vec<CartItem>,
}

impl CartSnapshot {
    /// Creates a snapshot from a set of cart rows.
    pub fn new(user_id: UserId, items: Vec<CartItem>) -> Self {
        Self { user_id, items }
    }

    /// Returns an empty snapshot for the user.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
        }
    }

    /// Recomputes the cart total from the item rows.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Returns the number of distinct rows.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
