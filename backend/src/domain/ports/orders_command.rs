//! Driving port for order status changes.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, Order, OrderId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrdersCommand: Send + Sync {
    /// Mark the order printed and return it for rendering.
    async fn print_order(&self, business_id: &AccountId, id: &OrderId) -> Result<Order, Error>;

    async fn complete_order(&self, business_id: &AccountId, id: &OrderId)
    -> Result<Order, Error>;

    async fn delete_order(&self, business_id: &AccountId, id: &OrderId) -> Result<(), Error>;
}
