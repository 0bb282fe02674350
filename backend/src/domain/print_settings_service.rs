//! Print settings for the signed-in business.
//!
//! Settings live in their own table; the auto-print toggle lives on the
//! account because the order board reads it on every new order.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, PrintSettingsCommand, PrintSettingsQuery,
    PrintSettingsRepository, PrintSettingsRepositoryError,
};
use crate::domain::{Account, AccountId, Error, PrintSettingsPatch, PrintSettingsView};

#[derive(Clone)]
pub struct PrintSettingsService<A, P> {
    accounts: Arc<A>,
    settings: Arc<P>,
}

impl<A, P> PrintSettingsService<A, P> {
    pub fn new(accounts: Arc<A>, settings: Arc<P>) -> Self {
        Self { accounts, settings }
    }
}

fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Missing { .. } => Error::not_found("business not found"),
        other => Error::internal(format!("account repository error: {other}")),
    }
}

fn map_settings_error(error: PrintSettingsRepositoryError) -> Error {
    match error {
        PrintSettingsRepositoryError::Connection { message } => Error::service_unavailable(
            format!("print settings repository unavailable: {message}"),
        ),
        PrintSettingsRepositoryError::Query { message } => {
            Error::internal(format!("print settings repository error: {message}"))
        }
    }
}

impl<A, P> PrintSettingsService<A, P>
where
    A: AccountRepository,
    P: PrintSettingsRepository,
{
    async fn business(&self, id: &AccountId) -> Result<Account, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_error)?
            .filter(Account::is_business)
            .ok_or_else(|| Error::not_found("business not found"))
    }

    async fn view(&self, account: &Account) -> Result<PrintSettingsView, Error> {
        let settings = self
            .settings
            .find(&account.id)
            .await
            .map_err(map_settings_error)?
            .unwrap_or_default();
        Ok(PrintSettingsView {
            settings,
            auto_print: account.auto_print,
        })
    }
}

#[async_trait]
impl<A, P> PrintSettingsQuery for PrintSettingsService<A, P>
where
    A: AccountRepository,
    P: PrintSettingsRepository,
{
    async fn print_settings(&self, business_id: &AccountId) -> Result<PrintSettingsView, Error> {
        let account = self.business(business_id).await?;
        self.view(&account).await
    }
}

#[async_trait]
impl<A, P> PrintSettingsCommand for PrintSettingsService<A, P>
where
    A: AccountRepository,
    P: PrintSettingsRepository,
{
    async fn update_print_settings(
        &self,
        business_id: &AccountId,
        patch: PrintSettingsPatch,
    ) -> Result<PrintSettingsView, Error> {
        let mut account = self.business(business_id).await?;
        let current = self.view(&account).await?.settings;
        let settings = patch.apply(current).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": err.field(), "code": err.code() }))
        })?;

        self.settings
            .save(business_id, &settings)
            .await
            .map_err(map_settings_error)?;
        if let Some(auto_print) = patch.auto_print.filter(|flag| *flag != account.auto_print) {
            account.auto_print = auto_print;
            self.accounts
                .update(&account)
                .await
                .map_err(map_account_error)?;
        }
        info!(business_id = %business_id, auto_print = account.auto_print, "print settings saved");

        Ok(PrintSettingsView {
            settings,
            auto_print: account.auto_print,
        })
    }
}
