//! PostgreSQL-backed `OrderRepository` over the `orders` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{OrderListFilter, OrderRepository, OrderRepositoryError};
use crate::domain::{AccountId, CallRecord, CallTotals, Order, OrderId, OrderStatus};

use super::diesel_basic_error_mapping::{
    column_to_u32, map_basic_diesel_error, map_basic_pool_error, u32_to_column,
};
use super::models::{NewOrderRow, OrderRow};
use super::pool::{DbPool, PoolError};
use super::schema::orders;

#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    map_basic_pool_error(error, OrderRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    map_basic_diesel_error(
        error,
        OrderRepositoryError::query,
        OrderRepositoryError::connection,
    )
}

fn row_to_order(row: OrderRow) -> Result<Order, OrderRepositoryError> {
    let status: OrderStatus = row.status.parse().map_err(|err: String| {
        warn!(order_id = %row.id, status = %row.status, "stored order has unknown status");
        OrderRepositoryError::query(err)
    })?;
    Ok(Order {
        id: OrderId::from_uuid(row.id),
        business_id: AccountId::from_uuid(row.business_id),
        caller_number: row.caller_number,
        caller_name: row.caller_name,
        order_details: row.order_details,
        quantity: column_to_u32(row.quantity),
        call_duration_secs: column_to_u32(row.call_duration_secs),
        call_status: row.call_status,
        transcript: row.transcript,
        status,
        webhook_payload: row.webhook_payload,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn count_from_column(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewOrderRow {
            id: *order.id.as_uuid(),
            business_id: *order.business_id.as_uuid(),
            caller_number: &order.caller_number,
            caller_name: &order.caller_name,
            order_details: &order.order_details,
            quantity: u32_to_column(order.quantity),
            call_duration_secs: u32_to_column(order.call_duration_secs),
            call_status: &order.call_status,
            transcript: &order.transcript,
            status: order.status.as_str(),
            webhook_payload: &order.webhook_payload,
            created_at: order.created_at,
            updated_at: order.updated_at,
        };
        diesel::insert_into(orders::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(
        &self,
        business_id: &AccountId,
        id: &OrderId,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = orders::table
            .filter(orders::id.eq(id.as_uuid()))
            .filter(orders::business_id.eq(business_id.as_uuid()))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_order).transpose()
    }

    async fn list(
        &self,
        business_id: &AccountId,
        filter: &OrderListFilter,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = orders::table
            .filter(orders::business_id.eq(business_id.as_uuid()))
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .into_boxed();
        if !filter.statuses.is_empty() {
            let statuses: Vec<&str> = filter.statuses.iter().map(|s| s.as_str()).collect();
            query = query.filter(orders::status.eq_any(statuses));
        }
        if let Some(from) = filter.from {
            query = query.filter(orders::created_at.ge(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(orders::created_at.le(to));
        }
        let rows: Vec<OrderRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_order).collect()
    }

    async fn update_status(
        &self,
        business_id: &AccountId,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            orders::table
                .filter(orders::id.eq(id.as_uuid()))
                .filter(orders::business_id.eq(business_id.as_uuid()))
                .filter(orders::status.eq(from.as_str())),
        )
        .set((
            orders::status.eq(to.as_str()),
            orders::updated_at.eq(updated_at),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_active(
        &self,
        business_id: &AccountId,
        id: &OrderId,
    ) -> Result<bool, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let active: Vec<&str> = OrderStatus::ACTIVE.iter().map(|s| s.as_str()).collect();
        let deleted = diesel::delete(
            orders::table
                .filter(orders::id.eq(id.as_uuid()))
                .filter(orders::business_id.eq(business_id.as_uuid()))
                .filter(orders::status.eq_any(active)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn call_totals(&self) -> Result<Vec<CallTotals>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(Uuid, i64, i64)> = orders::table
            .group_by(orders::business_id)
            .select((
                orders::business_id,
                sql::<BigInt>("COUNT(*)"),
                sql::<BigInt>("COALESCE(SUM((call_duration_secs::BIGINT + 59) / 60), 0)::BIGINT"),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(business_id, calls, minutes)| CallTotals {
                business_id: AccountId::from_uuid(business_id),
                calls: count_from_column(calls),
                billable_minutes: count_from_column(minutes),
            })
            .collect())
    }

    async fn calls_since(
        &self,
        business_id: &AccountId,
        since: DateTime<Utc>,
    ) -> Result<Vec<CallRecord>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(i32, DateTime<Utc>)> = orders::table
            .filter(orders::business_id.eq(business_id.as_uuid()))
            .filter(orders::created_at.ge(since))
            .select((orders::call_duration_secs, orders::created_at))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(secs, created_at)| CallRecord {
                duration_secs: column_to_u32(secs),
                created_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn row(status: &str) -> OrderRow {
        OrderRow {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            caller_number: "+91".to_owned(),
            caller_name: "Asha".to_owned(),
            order_details: "1 thali".to_owned(),
            quantity: 1,
            call_duration_secs: -3,
            call_status: "completed".to_owned(),
            transcript: String::new(),
            status: status.to_owned(),
            webhook_payload: json!({ "from": "+91" }),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("new", OrderStatus::New)]
    #[case("printed", OrderStatus::Printed)]
    #[case("completed", OrderStatus::Completed)]
    fn statuses_round_trip(#[case] raw: &str, #[case] expected: OrderStatus) {
        let order = row_to_order(row(raw)).expect("valid row");
        assert_eq!(order.status, expected);
        assert_eq!(order.call_duration_secs, 0);
        assert_eq!(order.webhook_payload, json!({ "from": "+91" }));
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        assert!(matches!(
            row_to_order(row("lost")),
            Err(OrderRepositoryError::Query { .. })
        ));
    }

    #[rstest]
    fn negative_aggregates_clamp_to_zero() {
        assert_eq!(count_from_column(-1), 0);
        assert_eq!(count_from_column(12), 12);
    }
}
