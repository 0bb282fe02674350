//! Driving port for reading print settings.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, PrintSettingsView};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrintSettingsQuery: Send + Sync {
    /// Stored settings or defaults, with the account's auto-print flag.
    async fn print_settings(&self, business_id: &AccountId) -> Result<PrintSettingsView, Error>;
}
