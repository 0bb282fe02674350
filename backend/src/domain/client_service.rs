//! Admin management of business client accounts.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, ClientsCommand, ClientsQuery, OrderRepository,
    OrderRepositoryError, PasswordHasher,
};
use crate::domain::{
    Account, AccountId, CallTotals, ClientSummary, ClientUpdate, Error, NewClient, PasswordHash,
    Role, TraceId,
};

/// Client listing and mutations for the admin panel.
#[derive(Clone)]
pub struct ClientService<A, O, H> {
    accounts: Arc<A>,
    orders: Arc<O>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<A, O, H> ClientService<A, O, H> {
    pub fn new(accounts: Arc<A>, orders: Arc<O>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            orders,
            hasher,
            clock,
        }
    }
}

fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateUsername { .. } => Error::conflict("username already exists")
            .with_details(json!({ "field": "username", "code": "duplicate_username" })),
        AccountRepositoryError::Missing { .. } => client_not_found(),
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

fn client_not_found() -> Error {
    Error::not_found("client not found")
}

fn summarise(account: &Account, totals: Option<&CallTotals>) -> ClientSummary {
    let (calls, minutes) = totals.map_or((0, 0), |t| (t.calls, t.billable_minutes));
    ClientSummary::new(account, calls, minutes)
}

impl<A, O, H> ClientService<A, O, H>
where
    A: AccountRepository,
    O: OrderRepository,
    H: PasswordHasher + 'static,
{
    async fn hash_password(&self, password: &str) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = zeroize::Zeroizing::new(password.to_owned());
        TraceId::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing aborted: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))
    }

    async fn find_business(&self, id: &AccountId) -> Result<Account, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_error)?
            .filter(Account::is_business)
            .ok_or_else(client_not_found)
    }

    async fn totals_by_business(&self) -> Result<HashMap<AccountId, CallTotals>, Error> {
        let totals = self.orders.call_totals().await.map_err(map_order_error)?;
        Ok(totals.into_iter().map(|t| (t.business_id, t)).collect())
    }
}

#[async_trait]
impl<A, O, H> ClientsQuery for ClientService<A, O, H>
where
    A: AccountRepository,
    O: OrderRepository,
    H: PasswordHasher + 'static,
{
    async fn list_clients(&self) -> Result<Vec<ClientSummary>, Error> {
        let accounts = self
            .accounts
            .list_businesses()
            .await
            .map_err(map_account_error)?;
        let totals = self.totals_by_business().await?;
        Ok(accounts
            .iter()
            .map(|account| summarise(account, totals.get(&account.id)))
            .collect())
    }
}

#[async_trait]
impl<A, O, H> ClientsCommand for ClientService<A, O, H>
where
    A: AccountRepository,
    O: OrderRepository,
    H: PasswordHasher + 'static,
{
    async fn create_client(&self, client: NewClient) -> Result<ClientSummary, Error> {
        let password_hash = self.hash_password(client.password()).await?;
        let account = Account {
            id: AccountId::random(),
            username: client.username,
            role: Role::Business,
            business_name: Some(client.business_name),
            call_rate: client.call_rate,
            auto_print: client.auto_print,
            is_active: true,
            logo_url: client.logo_url,
            webhook_url: client.webhook_url,
            password_hash,
            created_at: self.clock.utc(),
        };
        self.accounts
            .insert(&account)
            .await
            .map_err(map_account_error)?;
        info!(business_id = %account.id, username = %account.username, "client created");
        Ok(summarise(&account, None))
    }

    async fn update_client(
        &self,
        id: &AccountId,
        update: ClientUpdate,
    ) -> Result<ClientSummary, Error> {
        let mut account = self.find_business(id).await?;
        update.apply_to(&mut account);
        if let Some(password) = update.password() {
            account.password_hash = self.hash_password(password).await?;
        }
        self.accounts
            .update(&account)
            .await
            .map_err(map_account_error)?;
        info!(business_id = %account.id, is_active = account.is_active, "client updated");

        let totals = self.totals_by_business().await?;
        Ok(summarise(&account, totals.get(&account.id)))
    }

    async fn delete_client(&self, id: &AccountId) -> Result<(), Error> {
        let deleted = self
            .accounts
            .delete_business(id)
            .await
            .map_err(map_account_error)?;
        if !deleted {
            return Err(client_not_found());
        }
        info!(business_id = %id, "client deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_service_tests.rs"]
mod tests;
