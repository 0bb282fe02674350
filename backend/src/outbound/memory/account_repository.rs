use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, AccountId, Role};

use super::Tables;

#[derive(Debug, Clone)]
pub struct InMemoryAccountRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryAccountRepository {
    pub(super) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self.tables.read().await.accounts.get(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
        role: Role,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|account| account.role == role && account.username.as_ref() == username)
            .cloned())
    }

    async fn list_businesses(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        let tables = self.tables.read().await;
        let mut businesses: Vec<Account> = tables
            .accounts
            .values()
            .filter(|account| account.is_business())
            .cloned()
            .collect();
        businesses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(businesses)
    }

    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .accounts
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(AccountRepositoryError::duplicate_username(
                account.username.as_ref(),
            ));
        }
        tables.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.accounts.get_mut(&account.id) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(AccountRepositoryError::missing(account.id.to_string())),
        }
    }

    async fn delete_business(&self, id: &AccountId) -> Result<bool, AccountRepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.get(id).is_some_and(Account::is_business) {
            return Ok(false);
        }
        tables.accounts.remove(id);
        tables.orders.retain(|_, order| order.business_id != *id);
        tables.print_settings.remove(id);
        Ok(true)
    }
}
