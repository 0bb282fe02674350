//! Driving port for the admin client listing.

use async_trait::async_trait;

use crate::domain::{ClientSummary, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientsQuery: Send + Sync {
    /// Business accounts newest first, each with lifetime call totals.
    async fn list_clients(&self) -> Result<Vec<ClientSummary>, Error>;
}
