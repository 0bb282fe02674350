//! Driven port for per-business print settings.

use async_trait::async_trait;

use crate::domain::{AccountId, PrintSettings};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by print settings adapters.
    pub enum PrintSettingsRepositoryError {
        Connection { message: String } =>
            "print settings repository connection failed: {message}",
        Query { message: String } => "print settings repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrintSettingsRepository: Send + Sync {
    /// Stored settings, or `None` when the business never saved any.
    async fn find(
        &self,
        business_id: &AccountId,
    ) -> Result<Option<PrintSettings>, PrintSettingsRepositoryError>;

    /// Insert or replace the settings row.
    async fn save(
        &self,
        business_id: &AccountId,
        settings: &PrintSettings,
    ) -> Result<(), PrintSettingsRepositoryError>;
}
