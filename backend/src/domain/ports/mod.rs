//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `Clients*`, `Orders*`, `CallIngestion`,
//! `CallUsageQuery`, `PrintSettings*`) are what the HTTP adapter calls.
//! Driven ports (`*Repository`, `PasswordHasher`) are what the services call.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod call_ingestion;
mod call_usage_query;
mod clients_command;
mod clients_query;
mod login_service;
mod order_repository;
mod orders_command;
mod orders_query;
mod password_hasher;
mod print_settings_command;
mod print_settings_query;
mod print_settings_repository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use call_ingestion::MockCallIngestion;
pub use call_ingestion::CallIngestion;
#[cfg(test)]
pub use call_usage_query::MockCallUsageQuery;
pub use call_usage_query::CallUsageQuery;
#[cfg(test)]
pub use clients_command::MockClientsCommand;
pub use clients_command::ClientsCommand;
#[cfg(test)]
pub use clients_query::MockClientsQuery;
pub use clients_query::ClientsQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderListFilter, OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use orders_command::MockOrdersCommand;
pub use orders_command::OrdersCommand;
#[cfg(test)]
pub use orders_query::MockOrdersQuery;
pub use orders_query::{ActiveOrders, OrdersQuery};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use print_settings_command::MockPrintSettingsCommand;
pub use print_settings_command::PrintSettingsCommand;
#[cfg(test)]
pub use print_settings_query::MockPrintSettingsQuery;
pub use print_settings_query::PrintSettingsQuery;
#[cfg(test)]
pub use print_settings_repository::MockPrintSettingsRepository;
pub use print_settings_repository::{PrintSettingsRepository, PrintSettingsRepositoryError};
