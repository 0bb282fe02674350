//! Voice-orders server entry-point: loads settings, prepares storage and
//! serves the dashboard API, the call webhook and the health probes.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use voice_orders::domain::BootstrapOutcome;
use voice_orders::inbound::http::health::HealthState;
use voice_orders::inbound::http::session_config::{BuildMode, session_settings_from_env};
use voice_orders::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use voice_orders::outbound::security::BcryptPasswordHasher;
use voice_orders::settings::AppSettings;

use server::{ServerConfig, create_server, ensure_bootstrap_admin};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(io::Error::other)?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    let hasher = BcryptPasswordHasher::new(settings.bcrypt_cost()).map_err(io::Error::other)?;

    let mut config = ServerConfig::new(session, settings.bind_addr().map_err(io::Error::other)?)
        .with_hasher(hasher)
        .with_monthly_minute_limit(settings.monthly_minute_limit());

    match settings.database_url() {
        Some(url) => {
            let applied = run_migrations(url).await.map_err(io::Error::other)?;
            info!(applied, "database migrations complete");
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; using in-memory storage"),
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::default_metrics());

    if let Some((username, password)) = settings.bootstrap_admin().map_err(io::Error::other)? {
        match ensure_bootstrap_admin(&config, username, password)
            .await
            .map_err(io::Error::other)?
        {
            BootstrapOutcome::Created => info!(username, "bootstrap admin ready"),
            BootstrapOutcome::AlreadyPresent => info!(username, "bootstrap admin already present"),
        }
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if actix_web::rt::signal::ctrl_c().await.is_ok() {
            health_state.mark_unhealthy();
            info!("shutdown requested; draining connections");
            handle.stop(true).await;
        }
    });
    server.await
}
