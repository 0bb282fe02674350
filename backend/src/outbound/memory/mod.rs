//! In-memory repositories for development runs and integration tests.
//!
//! All three repositories share one [`InMemoryStore`], so deleting a business
//! cascades to its orders and print settings the same way the foreign keys do
//! in PostgreSQL.

mod account_repository;
mod order_repository;
mod print_settings_repository;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{Account, AccountId, Order, OrderId, PrintSettings};

pub use account_repository::InMemoryAccountRepository;
pub use order_repository::InMemoryOrderRepository;
pub use print_settings_repository::InMemoryPrintSettingsRepository;

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    orders: HashMap<OrderId, Order>,
    print_settings: HashMap<AccountId, PrintSettings>,
}

/// Shared backing store handed out as per-port repositories.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> InMemoryAccountRepository {
        InMemoryAccountRepository::new(Arc::clone(&self.tables))
    }

    pub fn orders(&self) -> InMemoryOrderRepository {
        InMemoryOrderRepository::new(Arc::clone(&self.tables))
    }

    pub fn print_settings(&self) -> InMemoryPrintSettingsRepository {
        InMemoryPrintSettingsRepository::new(Arc::clone(&self.tables))
    }
}
