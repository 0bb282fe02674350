//! Usage and billing figures for the signed-in business.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, CallUsageQuery, OrderRepository,
    OrderRepositoryError,
};
use crate::domain::usage::month_start;
use crate::domain::{AccountId, CallUsage, Error};

#[derive(Clone)]
pub struct UsageService<A, O> {
    accounts: Arc<A>,
    orders: Arc<O>,
    clock: Arc<dyn Clock>,
    monthly_limit_minutes: u64,
}

impl<A, O> UsageService<A, O> {
    pub fn new(
        accounts: Arc<A>,
        orders: Arc<O>,
        clock: Arc<dyn Clock>,
        monthly_limit_minutes: u64,
    ) -> Self {
        Self {
            accounts,
            orders,
            clock,
            monthly_limit_minutes,
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
impl<A, O> CallUsageQuery for UsageService<A, O>
where
    A: AccountRepository,
    O: OrderRepository,
{
    async fn call_usage(&self, business_id: &AccountId) -> Result<CallUsage, Error> {
        let account = self
            .accounts
            .find_by_id(business_id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::not_found("business not found"))?;

        let now = self.clock.utc();
        let calls = self
            .orders
            .calls_since(business_id, month_start(now))
            .await
            .map_err(map_order_error)?;
        Ok(CallUsage::compute(
            &calls,
            account.call_rate,
            self.monthly_limit_minutes,
            now,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{business_account, fixture_clock, fixture_now};
    use crate::domain::ports::{MockAccountRepository, MockOrderRepository};
    use crate::domain::{CallRate, CallRecord, ErrorCode};
    use chrono::Duration;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn prices_calls_at_the_account_rate() {
        let mut account = business_account("spice");
        account.call_rate = CallRate::from_paise(300);
        let id = account.id;
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(account)));
        let mut orders = MockOrderRepository::new();
        orders
            .expect_calls_since()
            .withf(|_, since| *since == month_start(fixture_now()))
            .return_once(|_, _| {
                Ok(vec![
                    CallRecord {
                        duration_secs: 61,
                        created_at: fixture_now() - Duration::hours(1),
                    },
                    CallRecord {
                        duration_secs: 30,
                        created_at: fixture_now() - Duration::days(3),
                    },
                ])
            });

        let usage = UsageService::new(Arc::new(accounts), Arc::new(orders), fixture_clock(), 100)
            .call_usage(&id)
            .await
            .expect("usage");

        assert_eq!(usage.today.minutes, 2);
        assert_eq!(usage.today.charges_paise, 600);
        assert_eq!(usage.this_month.minutes, 3);
        assert_eq!(usage.monthly_limit_minutes, 100);
        assert!((usage.limit_used_percent - 3.0).abs() < 1e-9);
    }

    #[rstest]
    #[tokio::test]
    async fn deleted_account_is_not_found() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().return_once(|_| Ok(None));
        let mut orders = MockOrderRepository::new();
        orders.expect_calls_since().never();

        let err = UsageService::new(Arc::new(accounts), Arc::new(orders), fixture_clock(), 5000)
            .call_usage(&AccountId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
