//! Driven port for account persistence.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, Role};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// The username is already taken by another account.
        DuplicateUsername { username: String } => "username already exists: {username}",
        /// The account to update does not exist.
        Missing { id: String } => "account not found: {id}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Look up an account by username within one role.
    async fn find_by_username(
        &self,
        username: &str,
        role: Role,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Business accounts, newest first.
    async fn list_businesses(&self) -> Result<Vec<Account>, AccountRepositoryError>;

    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError>;

    /// Overwrite every mutable column of an existing account.
    async fn update(&self, account: &Account) -> Result<(), AccountRepositoryError>;

    /// Delete a business account. Returns `false` when no business matched.
    async fn delete_business(&self, id: &AccountId) -> Result<bool, AccountRepositoryError>;
}
