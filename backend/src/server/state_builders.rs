//! Builders wiring repositories and services into the HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use voice_orders::domain::ports::{AccountRepository, OrderRepository, PrintSettingsRepository};
use voice_orders::domain::{
    AccountLoginService, AdminBootstrap, BootstrapOutcome, CallIngestionService, ClientService,
    Error, OrderService, PrintSettingsService, UsageService,
};
use voice_orders::inbound::http::state::HttpState;
use voice_orders::outbound::persistence::{
    DieselAccountRepository, DieselOrderRepository, DieselPrintSettingsRepository,
};
use voice_orders::outbound::security::BcryptPasswordHasher;

use super::{ServerConfig, Storage};

/// Dependencies shared by every service regardless of storage.
struct SharedDeps {
    hasher: Arc<BcryptPasswordHasher>,
    clock: Arc<dyn Clock>,
    monthly_minute_limit: u64,
}

impl SharedDeps {
    fn from_config(config: &ServerConfig) -> Self {
        Self {
            hasher: Arc::clone(&config.hasher),
            clock: Arc::new(DefaultClock),
            monthly_minute_limit: config.monthly_minute_limit,
        }
    }
}

fn wire_services<A, O, P>(
    accounts: Arc<A>,
    orders: Arc<O>,
    settings: Arc<P>,
    deps: SharedDeps,
) -> HttpState
where
    A: AccountRepository + 'static,
    O: OrderRepository + 'static,
    P: PrintSettingsRepository + 'static,
{
    let SharedDeps {
        hasher,
        clock,
        monthly_minute_limit,
    } = deps;

    let clients = Arc::new(ClientService::new(
        Arc::clone(&accounts),
        Arc::clone(&orders),
        Arc::clone(&hasher),
        Arc::clone(&clock),
    ));
    let order_service = Arc::new(OrderService::new(Arc::clone(&orders), Arc::clone(&clock)));
    let print_settings = Arc::new(PrintSettingsService::new(Arc::clone(&accounts), settings));

    HttpState {
        login: Arc::new(AccountLoginService::new(Arc::clone(&accounts), hasher)),
        clients: clients.clone(),
        clients_query: clients,
        orders: order_service.clone(),
        orders_query: order_service,
        calls: Arc::new(CallIngestionService::new(
            Arc::clone(&accounts),
            Arc::clone(&orders),
            Arc::clone(&clock),
        )),
        usage: Arc::new(UsageService::new(
            accounts,
            orders,
            clock,
            monthly_minute_limit,
        )),
        print_settings: print_settings.clone(),
        print_settings_query: print_settings,
    }
}

/// Build handler state over the configured storage.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let deps = SharedDeps::from_config(config);
    match &config.storage {
        Storage::Postgres(pool) => wire_services(
            Arc::new(DieselAccountRepository::new(pool.clone())),
            Arc::new(DieselOrderRepository::new(pool.clone())),
            Arc::new(DieselPrintSettingsRepository::new(pool.clone())),
            deps,
        ),
        Storage::Memory(store) => wire_services(
            Arc::new(store.accounts()),
            Arc::new(store.orders()),
            Arc::new(store.print_settings()),
            deps,
        ),
    }
}

/// Seed an admin account in the configured storage.
pub async fn ensure_bootstrap_admin(
    config: &ServerConfig,
    username: &str,
    password: &str,
) -> Result<BootstrapOutcome, Error> {
    let hasher = Arc::clone(&config.hasher);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.storage {
        Storage::Postgres(pool) => {
            AdminBootstrap::new(
                Arc::new(DieselAccountRepository::new(pool.clone())),
                hasher,
                clock,
            )
            .ensure_admin(username, password)
            .await
        }
        Storage::Memory(store) => {
            AdminBootstrap::new(Arc::new(store.accounts()), hasher, clock)
                .ensure_admin(username, password)
                .await
        }
    }
}
