//! Order board, lifecycle transitions and history for a business.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    ActiveOrders, OrderListFilter, OrderRepository, OrderRepositoryError, OrdersCommand,
    OrdersQuery,
};
use crate::domain::{
    AccountId, Error, HistoryFilter, Order, OrderHistory, OrderId, OrderStatus,
    OrderTransitionError,
};

#[derive(Clone)]
pub struct OrderService<O> {
    orders: Arc<O>,
    clock: Arc<dyn Clock>,
}

impl<O> OrderService<O> {
    pub fn new(orders: Arc<O>, clock: Arc<dyn Clock>) -> Self {
        Self { orders, clock }
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

const TRANSITION_ATTEMPTS: usize = 3;

fn order_not_found() -> Error {
    Error::not_found("order not found")
}

fn transition_conflict(error: OrderTransitionError) -> Error {
    Error::conflict(error.to_string()).with_details(json!({
        "code": "invalid_transition",
        "status": error.from,
    }))
}

impl<O> OrderService<O>
where
    O: OrderRepository,
{
    async fn load(&self, business_id: &AccountId, id: &OrderId) -> Result<Order, Error> {
        self.orders
            .find(business_id, id)
            .await
            .map_err(map_order_error)?
            .ok_or_else(order_not_found)
    }

    async fn transition(
        &self,
        business_id: &AccountId,
        id: &OrderId,
        next: impl Fn(OrderStatus) -> Result<OrderStatus, OrderTransitionError> + Send + Sync,
    ) -> Result<Order, Error> {
        // A concurrent request may move the order between the read and the
        // write; the write only lands on the status that was read.
        for _ in 0..TRANSITION_ATTEMPTS {
            let mut order = self.load(business_id, id).await?;
            let status = next(order.status).map_err(transition_conflict)?;
            if status == OrderStatus::Completed && order.status == OrderStatus::Completed {
                return Ok(order);
            }

            let now = self.clock.utc();
            let updated = self
                .orders
                .update_status(business_id, id, order.status, status, now)
                .await
                .map_err(map_order_error)?;
            if updated {
                info!(order_id = %id, business_id = %business_id, status = %status, "order status changed");
                order.status = status;
                order.updated_at = now;
                return Ok(order);
            }
        }
        Err(Error::conflict("order changed while it was being updated"))
    }
}

#[async_trait]
impl<O> OrdersQuery for OrderService<O>
where
    O: OrderRepository,
{
    async fn active_orders(&self, business_id: &AccountId) -> Result<ActiveOrders, Error> {
        let filter = OrderListFilter::with_statuses(OrderStatus::ACTIVE);
        let mut orders = self
            .orders
            .list(business_id, &filter)
            .await
            .map_err(map_order_error)?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let new_count = orders
            .iter()
            .filter(|order| order.status == OrderStatus::New)
            .count();
        Ok(ActiveOrders { orders, new_count })
    }

    async fn order_history(
        &self,
        business_id: &AccountId,
        filter: &HistoryFilter,
    ) -> Result<OrderHistory, Error> {
        let scope = OrderListFilter {
            statuses: vec![OrderStatus::Completed],
            from: filter.from(),
            to: filter.to(),
        };
        let orders = self
            .orders
            .list(business_id, &scope)
            .await
            .map_err(map_order_error)?;
        Ok(OrderHistory::from_orders(orders, filter))
    }
}

#[async_trait]
impl<O> OrdersCommand for OrderService<O>
where
    O: OrderRepository,
{
    async fn print_order(&self, business_id: &AccountId, id: &OrderId) -> Result<Order, Error> {
        self.transition(business_id, id, OrderStatus::print).await
    }

    async fn complete_order(
        &self,
        business_id: &AccountId,
        id: &OrderId,
    ) -> Result<Order, Error> {
        self.transition(business_id, id, OrderStatus::complete).await
    }

    async fn delete_order(&self, business_id: &AccountId, id: &OrderId) -> Result<(), Error> {
        let order = self.load(business_id, id).await?;
        order
            .status
            .ensure_deletable()
            .map_err(transition_conflict)?;
        let deleted = self
            .orders
            .delete_active(business_id, id)
            .await
            .map_err(map_order_error)?;
        if !deleted {
            // Either gone or completed since the read.
            let current = self.load(business_id, id).await?;
            current
                .status
                .ensure_deletable()
                .map_err(transition_conflict)?;
            return Err(Error::conflict("order changed while it was being deleted"));
        }
        info!(order_id = %id, business_id = %business_id, "order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::fixtures::{fixture_clock, fixture_now, order_for};
    use crate::domain::ports::MockOrderRepository;
    use chrono::Duration;
    use rstest::rstest;

    fn service(repo: MockOrderRepository) -> OrderService<MockOrderRepository> {
        OrderService::new(Arc::new(repo), fixture_clock())
    }

    fn repo_holding(order: Order) -> MockOrderRepository {
        let mut repo = MockOrderRepository::new();
        repo.expect_find()
            .return_once(move |_, _| Ok(Some(order)));
        repo
    }

    #[rstest]
    #[case(OrderStatus::New, OrderStatus::Printed)]
    #[case(OrderStatus::Printed, OrderStatus::Printed)]
    #[tokio::test]
    async fn printing_persists_printed_status(
        #[case] from: OrderStatus,
        #[case] expected: OrderStatus,
    ) {
        let business = AccountId::random();
        let order = order_for(business, from);
        let id = order.id;
        let mut repo = repo_holding(order);
        repo.expect_update_status()
            .withf(move |_, _, old, status, at| {
                *old == from && *status == expected && *at == fixture_now()
            })
            .times(1)
            .return_once(|_, _, _, _, _| Ok(true));

        let printed = service(repo)
            .print_order(&business, &id)
            .await
            .expect("printed");
        assert_eq!(printed.status, expected);
        assert_eq!(printed.updated_at, fixture_now());
    }

    #[rstest]
    #[case(OrderStatus::Completed)]
    #[tokio::test]
    async fn printing_completed_order_conflicts(#[case] from: OrderStatus) {
        let business = AccountId::random();
        let order = order_for(business, from);
        let id = order.id;
        let mut repo = repo_holding(order);
        repo.expect_update_status().never();

        let err = service(repo)
            .print_order(&business, &id)
            .await
            .expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn completing_new_order_conflicts() {
        let business = AccountId::random();
        let order = order_for(business, OrderStatus::New);
        let id = order.id;
        let err = service(repo_holding(order))
            .complete_order(&business, &id)
            .await
            .expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn completing_twice_is_a_no_op() {
        let business = AccountId::random();
        let order = order_for(business, OrderStatus::Completed);
        let id = order.id;
        let mut repo = repo_holding(order);
        repo.expect_update_status().never();

        let completed = service(repo)
            .complete_order(&business, &id)
            .await
            .expect("idempotent");
        assert_eq!(completed.status, OrderStatus::Completed);
    }

    #[rstest]
    #[tokio::test]
    async fn other_business_order_is_not_found() {
        let mut repo = MockOrderRepository::new();
        repo.expect_find().return_once(|_, _| Ok(None));

        let err = service(repo)
            .delete_order(&AccountId::random(), &OrderId::random())
            .await
            .expect_err("not found");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn completed_orders_cannot_be_deleted() {
        let business = AccountId::random();
        let order = order_for(business, OrderStatus::Completed);
        let id = order.id;
        let mut repo = repo_holding(order);
        repo.expect_delete_active().never();

        let err = service(repo)
            .delete_order(&business, &id)
            .await
            .expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    fn repo_reading(snapshots: Vec<Option<Order>>) -> MockOrderRepository {
        let calls = snapshots.len();
        let mut snapshots = snapshots.into_iter();
        let mut repo = MockOrderRepository::new();
        repo.expect_find()
            .times(calls)
            .returning(move |_, _| Ok(snapshots.next().flatten()));
        repo
    }

    #[rstest]
    #[tokio::test]
    async fn print_racing_a_completion_conflicts_without_reverting() {
        let business = AccountId::random();
        let fresh = order_for(business, OrderStatus::Printed);
        let id = fresh.id;
        let mut done = fresh.clone();
        done.status = OrderStatus::Completed;
        let mut repo = repo_reading(vec![Some(fresh), Some(done)]);
        repo.expect_update_status()
            .withf(|_, _, from, to, _| {
                *from == OrderStatus::Printed && *to == OrderStatus::Printed
            })
            .times(1)
            .return_once(|_, _, _, _, _| Ok(false));

        let err = service(repo)
            .print_order(&business, &id)
            .await
            .expect_err("completed meanwhile");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn lost_update_is_retried_against_the_fresh_status() {
        let business = AccountId::random();
        let fresh = order_for(business, OrderStatus::New);
        let id = fresh.id;
        let mut printed = fresh.clone();
        printed.status = OrderStatus::Printed;
        let mut repo = repo_reading(vec![Some(fresh), Some(printed)]);
        repo.expect_update_status()
            .withf(|_, _, from, _, _| *from == OrderStatus::New)
            .times(1)
            .return_once(|_, _, _, _, _| Ok(false));
        repo.expect_update_status()
            .withf(|_, _, from, _, _| *from == OrderStatus::Printed)
            .times(1)
            .return_once(|_, _, _, _, _| Ok(true));

        let printed = service(repo)
            .print_order(&business, &id)
            .await
            .expect("second attempt lands");
        assert_eq!(printed.status, OrderStatus::Printed);
    }

    #[rstest]
    #[case(Some(OrderStatus::Completed), ErrorCode::Conflict)]
    #[case(None, ErrorCode::NotFound)]
    #[tokio::test]
    async fn delete_racing_another_request_keeps_the_order(
        #[case] after: Option<OrderStatus>,
        #[case] expected: ErrorCode,
    ) {
        let business = AccountId::random();
        let fresh = order_for(business, OrderStatus::Printed);
        let id = fresh.id;
        let later = after.map(|status| Order {
            status,
            ..fresh.clone()
        });
        let mut repo = repo_reading(vec![Some(fresh), later]);
        repo.expect_delete_active()
            .times(1)
            .return_once(|_, _| Ok(false));

        let err = service(repo)
            .delete_order(&business, &id)
            .await
            .expect_err("delete must not land");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn active_orders_are_newest_first_with_new_count() {
        let business = AccountId::random();
        let mut older = order_for(business, OrderStatus::New);
        older.created_at = fixture_now() - Duration::minutes(5);
        let newer = order_for(business, OrderStatus::Printed);
        let newest = order_for(business, OrderStatus::New);
        let mut newest = newest;
        newest.created_at = fixture_now() + Duration::minutes(1);
        let newest_id = newest.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_list()
            .withf(|_, filter| {
                filter.statuses == [OrderStatus::New, OrderStatus::Printed]
            })
            .return_once(move |_, _| Ok(vec![older, newer, newest]));

        let active = service(repo)
            .active_orders(&business)
            .await
            .expect("board");
        assert_eq!(active.new_count, 2);
        assert_eq!(active.orders[0].id, newest_id);
    }

    #[rstest]
    #[tokio::test]
    async fn history_only_requests_completed_orders() {
        let business = AccountId::random();
        let done = order_for(business, OrderStatus::Completed);
        let mut repo = MockOrderRepository::new();
        repo.expect_list()
            .withf(|_, filter| filter.statuses == [OrderStatus::Completed])
            .return_once(move |_, _| Ok(vec![done]));

        let filter = HistoryFilter::new(Some("asha"), None, None).expect("filter");
        let history = service(repo)
            .order_history(&business, &filter)
            .await
            .expect("history");
        assert_eq!(history.summary.total_orders, 1);
        assert_eq!(history.summary.total_minutes, 2);
    }
}
