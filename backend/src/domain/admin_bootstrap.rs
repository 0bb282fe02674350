//! Seeds the first admin account at startup.
//!
//! The admin panel can only be reached by an admin, so a fresh database needs
//! one created out of band. Existing accounts are never modified.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{AccountRepository, AccountRepositoryError, PasswordHasher};
use crate::domain::{Account, Error, PASSWORD_MIN_LEN, Role, TraceId, Username};

/// Outcome of [`AdminBootstrap::ensure_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    AlreadyPresent,
}

pub struct AdminBootstrap<A, H> {
    accounts: Arc<A>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<A, H> AdminBootstrap<A, H>
where
    A: AccountRepository,
    H: PasswordHasher + 'static,
{
    pub fn new(accounts: Arc<A>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            hasher,
            clock,
        }
    }

    /// Create `username` as an admin unless an admin with that name exists.
    pub async fn ensure_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<BootstrapOutcome, Error> {
        let username = Username::new(username)
            .map_err(|err| Error::invalid_request(format!("bootstrap admin: {err}")))?;
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(Error::invalid_request(format!(
                "bootstrap admin password must be at least {PASSWORD_MIN_LEN} characters"
            )));
        }
        let existing = self
            .accounts
            .find_by_username(username.as_ref(), Role::Admin)
            .await
            .map_err(map_account_error)?;
        if existing.is_some() {
            return Ok(BootstrapOutcome::AlreadyPresent);
        }

        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        let hash = TraceId::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing aborted: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))?;

        let admin = Account::admin(username, hash, self.clock.utc());
        match self.accounts.insert(&admin).await {
            Ok(()) => {
                info!(username = %admin.username, account_id = %admin.id, "bootstrap admin created");
                Ok(BootstrapOutcome::Created)
            }
            Err(AccountRepositoryError::DuplicateUsername { username }) => Err(Error::conflict(
                format!("username {username} is taken by a non-admin account"),
            )),
            Err(err) => Err(map_account_error(err)),
        }
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
