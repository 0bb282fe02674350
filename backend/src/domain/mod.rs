//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities used by the HTTP and
//! persistence adapters, and the services implementing the driving ports.
//! Nothing in here depends on actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Account, Order, PrintSettings: persisted aggregates.
//! - CallEvent: webhook payload normalisation.
//! - OrderHistory, CallUsage: read models for the business dashboard.
//! - *Service: port implementations wired by the server.
//! - AdminBootstrap: first-run admin seeding.

pub mod account;
pub mod admin_bootstrap;
pub mod auth;
pub mod call_event;
pub mod call_ingestion_service;
pub mod client;
pub mod client_service;
pub mod error;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod login_service;
pub mod order;
pub mod order_history;
pub mod order_service;
pub mod ports;
pub mod print_settings;
pub mod print_settings_service;
pub mod trace_id;
pub mod usage;
pub mod usage_service;

pub use self::account::{
    Account, AccountId, AccountValidationError, BusinessName, CallRate, PasswordHash, Role,
    Username,
};
pub use self::admin_bootstrap::{AdminBootstrap, BootstrapOutcome};
pub use self::auth::{LoginCredentials, LoginValidationError, Principal};
pub use self::call_event::{CallEvent, CallEventError};
pub use self::call_ingestion_service::CallIngestionService;
pub use self::client::{
    ClientDraft, ClientPatch, ClientSummary, ClientUpdate, ClientValidationError, NewClient,
    PASSWORD_MIN_LEN,
};
pub use self::client_service::ClientService;
pub use self::error::{Error, ErrorCode};
pub use self::login_service::AccountLoginService;
pub use self::order::{Order, OrderId, OrderStatus, OrderTransitionError, billable_minutes};
pub use self::order_history::{
    CSV_HEADER, HistoryFilter, HistoryFilterError, HistorySummary, OrderHistory,
};
pub use self::order_service::OrderService;
pub use self::print_settings::{
    PaperSize, PrintSettings, PrintSettingsError, PrintSettingsPatch, PrintSettingsView,
    PrinterType,
};
pub use self::print_settings_service::PrintSettingsService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::usage::{
    CallRecord, CallTotals, CallUsage, DEFAULT_MONTHLY_MINUTE_LIMIT, UsagePeriod,
};
pub use self::usage_service::UsageService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use voice_orders::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
