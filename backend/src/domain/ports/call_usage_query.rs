//! Driving port for the usage and billing page.

use async_trait::async_trait;

use crate::domain::{AccountId, CallUsage, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallUsageQuery: Send + Sync {
    async fn call_usage(&self, business_id: &AccountId) -> Result<CallUsage, Error>;
}
