//! Driving port for the business order board and history.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{AccountId, Error, HistoryFilter, Order, OrderHistory};

/// Orders still on the board, plus how many are waiting to be printed.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveOrders {
    pub orders: Vec<Order>,
    pub new_count: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrdersQuery: Send + Sync {
    /// `new` and `printed` orders, newest first.
    async fn active_orders(&self, business_id: &AccountId) -> Result<ActiveOrders, Error>;

    /// Completed orders matching `filter`, with totals.
    async fn order_history(
        &self,
        business_id: &AccountId,
        filter: &HistoryFilter,
    ) -> Result<OrderHistory, Error>;
}
