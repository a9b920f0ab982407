use std::str::FromStr;

use common::UserId;
use domain::{OrderStatus, PaymentStatus};

use crate::error::OrderStoreError;

/// Sortable order fields, named on the wire in camelCase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Sort by creation time.
    #[default]
    CreatedAt,

    /// Sort by last update time.
    UpdatedAt,

    /// Sort by order total.
    TotalAmount,

    /// Sort by status name.
    Status,
}

impl SortField {
    /// Returns the orders table column backing this field.
    pub fn as_column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::TotalAmount => "total_cents",
            SortField::Status => "status",
        }
    }
}

impl FromStr for SortField {
    type Err = OrderStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            "totalAmount" => Ok(SortField::TotalAmount),
            "status" => Ok(SortField::Status),
            other => Err(OrderStoreError::InvalidSortField(other.to_string())),
        }
    }
}

/// Sort direction; newest-first is the default for order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Descending (newest or largest first).
    #[default]
    Descending,

    /// Ascending (oldest or smallest first).
    Ascending,
}

impl SortDirection {
    /// Returns the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Descending => "DESC",
            SortDirection::Ascending => "ASC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = OrderStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            other => Err(OrderStoreError::InvalidSortDirection(other.to_string())),
        }
    }
}

/// Builder for per-user order listings.
///
/// Every listing is scoped to one user; status and payment-status filters
/// are optional and combine with AND.
#[derive(Debug, Clone)]
pub struct OrderQuery {
    /// The user whose orders are listed.
    pub user_id: UserId,

    /// Filter by lifecycle status.
    pub status: Option<OrderStatus>,

    /// Filter by payment status.
    pub payment_status: Option<PaymentStatus>,

    /// Field to sort by.
    pub sort_field: SortField,

    /// Sort direction.
    pub direction: SortDirection,
}

impl OrderQuery {
    /// Creates a query for all of a user's orders, sorted createdAt desc.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            status: None,
            payment_status: None,
            sort_field: SortField::default(),
            direction: SortDirection::default(),
        }
    }

    /// Filters by lifecycle status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filters by payment status.
    pub fn payment_status(mut self, payment_status: PaymentStatus) -> Self {
        self.payment_status = Some(payment_status);
        self
    }

    /// Sorts by the given field.
    pub fn sort_field(mut self, sort_field: SortField) -> Self {
        self.sort_field = sort_field;
        self
    }

    /// Sets the sort direction.
    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }
}
