//! Sign-in and session resolution against stored accounts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, LoginService, PasswordHashError, PasswordHasher,
};
use crate::domain::{AccountId, Error, LoginCredentials, PasswordHash, Principal, TraceId};

const INVALID_CREDENTIALS: &str = "invalid username or password";

/// [`LoginService`] backed by the account store and a password hasher.
pub struct AccountLoginService<A, H> {
    accounts: Arc<A>,
    hasher: Arc<H>,
}

impl<A, H> Clone for AccountLoginService<A, H> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<A, H> AccountLoginService<A, H> {
    pub fn new(accounts: Arc<A>, hasher: Arc<H>) -> Self {
        Self { accounts, hasher }
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

impl<A, H> AccountLoginService<A, H>
where
    H: PasswordHasher + 'static,
{
    async fn password_matches(&self, password: &str, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = zeroize::Zeroizing::new(password.to_owned());
        let outcome = TraceId::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| Error::internal(format!("password check aborted: {err}")))?;
        match outcome {
            Ok(matches) => Ok(matches),
            Err(PasswordHashError::MalformedHash { message }) => {
                warn!(%message, "stored password hash is not bcrypt; rejecting sign-in");
                Ok(false)
            }
            Err(err) => Err(Error::internal(err.to_string())),
        }
    }
}

#[async_trait]
impl<A, H> LoginService for AccountLoginService<A, H>
where
    A: AccountRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error> {
        let account = self
            .accounts
            .find_by_username(credentials.username(), credentials.role())
            .await
            .map_err(map_account_error)?;
        let Some(account) = account else {
            debug!(username = credentials.username(), "sign-in for unknown account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if !self
            .password_matches(credentials.password(), account.password_hash.clone())
            .await?
        {
            debug!(username = credentials.username(), "sign-in with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if !account.can_sign_in() {
            return Err(Error::forbidden("account is inactive"));
        }
        Ok(Principal::from(&account))
    }

    async fn resolve(&self, account_id: &AccountId) -> Result<Option<Principal>, Error> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await
            .map_err(map_account_error)?;
        Ok(account.as_ref().map(Principal::from))
    }
}
