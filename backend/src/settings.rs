//! Application settings loaded via OrthoConfig.
//!
//! Every field can be set with a `VOICE_ORDERS_`-prefixed environment
//! variable, a config file or a CLI flag. Unset optional values fall back to
//! the defaults exposed by the accessor methods.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_MONTHLY_MINUTE_LIMIT;
use crate::outbound::security::DEFAULT_BCRYPT_COST;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("bootstrap admin needs both a username and a password")]
    IncompleteBootstrapAdmin,
}

/// Server settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(prefix = "VOICE_ORDERS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. In-memory repositories are used when absent.
    pub database_url: Option<String>,
    pub bcrypt_cost: Option<u32>,
    /// Included minutes per month shown on the usage dashboard.
    pub monthly_minute_limit: Option<u64>,
    pub bootstrap_admin_username: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

impl AppSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST)
    }

    pub fn monthly_minute_limit(&self) -> u64 {
        self.monthly_minute_limit
            .unwrap_or(DEFAULT_MONTHLY_MINUTE_LIMIT)
    }

    /// Admin credentials to seed at startup, if configured.
    ///
    /// Setting only one of the two is an error rather than silently skipped.
    pub fn bootstrap_admin(&self) -> Result<Option<(&str, &str)>, SettingsError> {
        match (
            self.bootstrap_admin_username.as_deref(),
            self.bootstrap_admin_password.as_deref(),
        ) {
            (Some(username), Some(password)) => Ok(Some((username, password))),
            (None, None) => Ok(None),
            _ => Err(SettingsError::IncompleteBootstrapAdmin),
        }
    }
}
