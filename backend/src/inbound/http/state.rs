//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised against mocks or in-memory services.

use std::sync::Arc;

use crate::domain::ports::{
    CallIngestion, CallUsageQuery, ClientsCommand, ClientsQuery, LoginService, OrdersCommand,
    OrdersQuery, PrintSettingsCommand, PrintSettingsQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub clients: Arc<dyn ClientsCommand>,
    pub clients_query: Arc<dyn ClientsQuery>,
    pub orders: Arc<dyn OrdersCommand>,
    pub orders_query: Arc<dyn OrdersQuery>,
    pub calls: Arc<dyn CallIngestion>,
    pub usage: Arc<dyn CallUsageQuery>,
    pub print_settings: Arc<dyn PrintSettingsCommand>,
    pub print_settings_query: Arc<dyn PrintSettingsQuery>,
}
