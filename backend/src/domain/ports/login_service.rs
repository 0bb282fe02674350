//! Driving port for sign-in and session resolution.
//!
//! Inbound adapters call it to check credentials and to re-load the account
//! behind a session cookie, without importing persistence or hashing.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, LoginCredentials, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials against the account stored for their role.
    ///
    /// Unknown usernames and wrong passwords fail with the same
    /// `unauthorized` error; deactivated business accounts are `forbidden`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error>;

    /// Current state of the account behind a session, if it still exists.
    async fn resolve(&self, account_id: &AccountId) -> Result<Option<Principal>, Error>;
}
