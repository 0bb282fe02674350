//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use voice_orders::domain::DEFAULT_MONTHLY_MINUTE_LIMIT;
use voice_orders::inbound::http::session_config::SessionSettings;
use voice_orders::outbound::memory::InMemoryStore;
use voice_orders::outbound::persistence::DbPool;
use voice_orders::outbound::security::BcryptPasswordHasher;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Where accounts, orders and print settings live.
#[derive(Clone)]
pub enum Storage {
    Postgres(DbPool),
    /// Process-local tables; contents vanish on restart.
    Memory(InMemoryStore),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Storage,
    pub(crate) hasher: Arc<BcryptPasswordHasher>,
    pub(crate) monthly_minute_limit: u64,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// In-memory storage and default hashing until overridden.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            storage: Storage::Memory(InMemoryStore::new()),
            hasher: Arc::new(BcryptPasswordHasher::default()),
            monthly_minute_limit: DEFAULT_MONTHLY_MINUTE_LIMIT,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Use the PostgreSQL repositories backed by `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.storage = Storage::Postgres(pool);
        self
    }

    #[must_use]
    pub fn with_hasher(mut self, hasher: BcryptPasswordHasher) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    #[must_use]
    pub fn with_monthly_minute_limit(mut self, minutes: u64) -> Self {
        self.monthly_minute_limit = minutes;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
