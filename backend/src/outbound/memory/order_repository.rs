use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{OrderListFilter, OrderRepository, OrderRepositoryError};
use crate::domain::{AccountId, CallRecord, CallTotals, Order, OrderId, OrderStatus};

use super::Tables;

#[derive(Debug, Clone)]
pub struct InMemoryOrderRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryOrderRepository {
    pub(super) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }
}

fn owned_by<'a>(order: Option<&'a Order>, business_id: &AccountId) -> Option<&'a Order> {
    order.filter(|order| order.business_id == *business_id)
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&order.business_id) {
            return Err(OrderRepositoryError::query(format!(
                "business {} does not exist",
                order.business_id
            )));
        }
        tables.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn find(
        &self,
        business_id: &AccountId,
        id: &OrderId,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        let tables = self.tables.read().await;
        Ok(owned_by(tables.orders.get(id), business_id).cloned())
    }

    async fn list(
        &self,
        business_id: &AccountId,
        filter: &OrderListFilter,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|order| order.business_id == *business_id && filter.admits(order))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_status(
        &self,
        business_id: &AccountId,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, OrderRepositoryError> {
        let mut tables = self.tables.write().await;
        match tables
            .orders
            .get_mut(id)
            .filter(|order| order.business_id == *business_id && order.status == from)
        {
            Some(order) => {
                order.status = to;
                order.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_active(
        &self,
        business_id: &AccountId,
        id: &OrderId,
    ) -> Result<bool, OrderRepositoryError> {
        let mut tables = self.tables.write().await;
        if owned_by(tables.orders.get(id), business_id)
            .is_none_or(|order| !order.status.is_active())
        {
            return Ok(false);
        }
        Ok(tables.orders.remove(id).is_some())
    }

    async fn call_totals(&self) -> Result<Vec<CallTotals>, OrderRepositoryError> {
        let tables = self.tables.read().await;
        let mut totals: HashMap<AccountId, CallTotals> = HashMap::new();
        for order in tables.orders.values() {
            let entry = totals.entry(order.business_id).or_insert(CallTotals {
                business_id: order.business_id,
                calls: 0,
                billable_minutes: 0,
            });
            entry.calls = entry.calls.saturating_add(1);
            entry.billable_minutes = entry
                .billable_minutes
                .saturating_add(order.billable_minutes());
        }
        Ok(totals.into_values().collect())
    }

    async fn calls_since(
        &self,
        business_id: &AccountId,
        since: DateTime<Utc>,
    ) -> Result<Vec<CallRecord>, OrderRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .filter(|order| order.business_id == *business_id && order.created_at >= since)
            .map(|order| CallRecord {
                duration_secs: order.call_duration_secs,
                created_at: order.created_at,
            })
            .collect())
    }
}
