//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven repository ports backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories only translate between row structs and
//!   domain types. No business rules live here.
//! - **Internal models**: `models.rs` and `schema.rs` never leave this module.
//! - **Typed errors**: Diesel and pool failures map onto each port's error
//!   enum, separating connection loss from query failures.
//!
//! # Example
//!
//! ```ignore
//! use voice_orders::outbound::persistence::{DbPool, DieselOrderRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/orders")).await?;
//! let orders = DieselOrderRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_order_repository;
mod diesel_print_settings_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_print_settings_repository::DieselPrintSettingsRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
