//! Driving port for the call-event webhook.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{AccountId, Error, OrderId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallIngestion: Send + Sync {
    /// Store one order for `business_id` from a raw event body.
    ///
    /// Unknown, non-business or inactive accounts are `not_found`. Returns
    /// only once the order is persisted.
    async fn ingest(&self, business_id: &AccountId, payload: Value) -> Result<OrderId, Error>;
}
