use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{PrintSettingsRepository, PrintSettingsRepositoryError};
use crate::domain::{AccountId, PrintSettings};

use super::Tables;

#[derive(Debug, Clone)]
pub struct InMemoryPrintSettingsRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPrintSettingsRepository {
    pub(super) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl PrintSettingsRepository for InMemoryPrintSettingsRepository {
    async fn find(
        &self,
        business_id: &AccountId,
    ) -> Result<Option<PrintSettings>, PrintSettingsRepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .print_settings
            .get(business_id)
            .copied())
    }

    async fn save(
        &self,
        business_id: &AccountId,
        settings: &PrintSettings,
    ) -> Result<(), PrintSettingsRepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(business_id) {
            return Err(PrintSettingsRepositoryError::query(format!(
                "business {business_id} does not exist"
            )));
        }
        tables.print_settings.insert(*business_id, *settings);
        Ok(())
    }
}
