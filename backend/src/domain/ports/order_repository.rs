//! Driven port for order persistence.
//!
//! Every read and mutation is scoped by business id so adapters never hand
//! one business another business's orders.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AccountId, CallRecord, CallTotals, Order, OrderId, OrderStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order repository query failed: {message}",
    }
}

/// Status set and inclusive creation window for a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderListFilter {
    /// Empty means any status.
    pub statuses: Vec<OrderStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl OrderListFilter {
    pub fn with_statuses(statuses: impl Into<Vec<OrderStatus>>) -> Self {
        Self {
            statuses: statuses.into(),
            ..Self::default()
        }
    }

    pub fn admits(&self, order: &Order) -> bool {
        (self.statuses.is_empty() || self.statuses.contains(&order.status))
            && self.from.is_none_or(|from| order.created_at >= from)
            && self.to.is_none_or(|to| order.created_at <= to)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    async fn find(
        &self,
        business_id: &AccountId,
        id: &OrderId,
    ) -> Result<Option<Order>, OrderRepositoryError>;

    /// Orders for one business matching `filter`, newest first.
    async fn list(
        &self,
        business_id: &AccountId,
        filter: &OrderListFilter,
    ) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Move the order from `from` to `to`. Returns `false` when no order of
    /// this business is currently in `from`.
    async fn update_status(
        &self,
        business_id: &AccountId,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, OrderRepositoryError>;

    /// Delete the order while it is still active. Returns `false` when
    /// nothing was deleted.
    async fn delete_active(
        &self,
        business_id: &AccountId,
        id: &OrderId,
    ) -> Result<bool, OrderRepositoryError>;

    /// Lifetime call count and billable minutes per business.
    async fn call_totals(&self) -> Result<Vec<CallTotals>, OrderRepositoryError>;

    /// Durations of calls received at or after `since`.
    async fn calls_since(
        &self,
        business_id: &AccountId,
        since: DateTime<Utc>,
    ) -> Result<Vec<CallRecord>, OrderRepositoryError>;
}
