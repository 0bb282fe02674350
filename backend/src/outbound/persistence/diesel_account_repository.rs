//! PostgreSQL-backed `AccountRepository` over the `app_users` table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, AccountId, BusinessName, CallRate, PasswordHash, Role, Username};

use super::diesel_basic_error_mapping::{
    column_to_u32, is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
    u32_to_column,
};
use super::models::{AccountRow, AccountUpdate, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::app_users;

#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    map_basic_pool_error(error, AccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_basic_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn rate_to_column(rate: CallRate) -> i32 {
    u32_to_column(rate.paise())
}

/// Convert a row, rejecting values that violate domain invariants.
fn row_to_account(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    let invalid = |err: &dyn std::fmt::Display| {
        warn!(account_id = %row.id, error = %err, "stored account fails validation");
        AccountRepositoryError::query(format!("invalid stored account: {err}"))
    };
    let username = Username::new(&row.username).map_err(|err| invalid(&err))?;
    let role: Role = row.user_type.parse().map_err(|err| invalid(&err))?;
    let business_name = row
        .business_name
        .as_deref()
        .map(BusinessName::new)
        .transpose()
        .map_err(|err| invalid(&err))?;

    Ok(Account {
        id: AccountId::from_uuid(row.id),
        username,
        role,
        business_name,
        call_rate: CallRate::from_paise(column_to_u32(row.call_rate_paise)),
        auto_print: row.auto_print,
        is_active: row.is_active,
        logo_url: row.logo_url,
        webhook_url: row.webhook_url,
        password_hash: PasswordHash::new(row.password_hash),
        created_at: row.created_at,
    })
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = app_users::table
            .find(id.as_uuid())
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
        role: Role,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = app_users::table
            .filter(app_users::username.eq(username))
            .filter(app_users::user_type.eq(role.as_str()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn list_businesses(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AccountRow> = app_users::table
            .filter(app_users::user_type.eq(Role::Business.as_str()))
            .order(app_users::created_at.desc())
            .select(AccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_account).collect()
    }

    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAccountRow {
            id: *account.id.as_uuid(),
            username: account.username.as_ref(),
            password_hash: account.password_hash.as_str(),
            user_type: account.role.as_str(),
            business_name: account.business_name.as_ref().map(AsRef::as_ref),
            call_rate_paise: rate_to_column(account.call_rate),
            auto_print: account.auto_print,
            is_active: account.is_active,
            logo_url: account.logo_url.as_deref(),
            webhook_url: account.webhook_url.as_deref(),
            created_at: account.created_at,
        };
        diesel::insert_into(app_users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AccountRepositoryError::duplicate_username(account.username.as_ref())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn update(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = AccountUpdate {
            password_hash: account.password_hash.as_str(),
            business_name: account.business_name.as_ref().map(AsRef::as_ref),
            call_rate_paise: rate_to_column(account.call_rate),
            auto_print: account.auto_print,
            is_active: account.is_active,
            logo_url: account.logo_url.as_deref(),
            webhook_url: account.webhook_url.as_deref(),
        };
        let updated = diesel::update(app_users::table.find(account.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(AccountRepositoryError::missing(account.id.to_string()));
        }
        Ok(())
    }

    async fn delete_business(&self, id: &AccountId) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            app_users::table
                .filter(app_users::id.eq(id.as_uuid()))
                .filter(app_users::user_type.eq(Role::Business.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
