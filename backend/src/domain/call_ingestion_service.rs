//! Turns webhook call events into stored orders.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, CallIngestion, OrderRepository,
    OrderRepositoryError,
};
use crate::domain::{AccountId, CallEvent, Error, OrderId};

#[derive(Clone)]
pub struct CallIngestionService<A, O> {
    accounts: Arc<A>,
    orders: Arc<O>,
    clock: Arc<dyn Clock>,
}

impl<A, O> CallIngestionService<A, O> {
    pub fn new(accounts: Arc<A>, orders: Arc<O>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            orders,
            clock,
        }
    }
}

fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        other => Error::internal(format!("account repository error: {other}")),
    }
}

fn map_order_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
    }
}

#[async_trait]
impl<A, O> CallIngestion for CallIngestionService<A, O>
where
    A: AccountRepository,
    O: OrderRepository,
{
    async fn ingest(&self, business_id: &AccountId, payload: Value) -> Result<OrderId, Error> {
        let account = self
            .accounts
            .find_by_id(business_id)
            .await
            .map_err(map_account_error)?;
        let accepts_calls = account
            .as_ref()
            .is_some_and(|account| account.is_business() && account.is_active);
        if !accepts_calls {
            warn!(business_id = %business_id, "call event for unknown or inactive business");
            return Err(Error::not_found("business not found"));
        }

        let event = CallEvent::from_payload(payload).map_err(|err| {
            warn!(business_id = %business_id, error = %err, "rejected call event");
            Error::invalid_request(err.to_string())
        })?;
        let order = event.into_order(*business_id, self.clock.utc());
        self.orders.insert(&order).await.map_err(map_order_error)?;

        info!(
            order_id = %order.id,
            business_id = %business_id,
            duration_secs = order.call_duration_secs,
            "call event stored"
        );
        Ok(order.id)
    }
}
