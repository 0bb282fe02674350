//! Driving port for saving print settings.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, PrintSettingsPatch, PrintSettingsView};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrintSettingsCommand: Send + Sync {
    /// Validate and persist `patch`; `autoPrint` is written to the account.
    async fn update_print_settings(
        &self,
        business_id: &AccountId,
        patch: PrintSettingsPatch,
    ) -> Result<PrintSettingsView, Error>;
}
