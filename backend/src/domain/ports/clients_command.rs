//! Driving port for admin client mutations.

use async_trait::async_trait;

use crate::domain::{AccountId, ClientSummary, ClientUpdate, Error, NewClient};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientsCommand: Send + Sync {
    /// Hash the password and store a new business account.
    ///
    /// A taken username is a `conflict`.
    async fn create_client(&self, client: NewClient) -> Result<ClientSummary, Error>;

    /// Apply a partial update; unknown ids are `not_found`.
    async fn update_client(
        &self,
        id: &AccountId,
        update: ClientUpdate,
    ) -> Result<ClientSummary, Error>;

    /// Remove a business account and, through the store, its orders.
    async fn delete_client(&self, id: &AccountId) -> Result<(), Error>;
}
