//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every dashboard, webhook and health endpoint plus the
//! session cookie security scheme. The document backs Swagger UI in debug
//! builds and is printed by the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::ActiveOrders;
use crate::domain::{
    CallUsage, ClientSummary, Error, ErrorCode, HistorySummary, Order, OrderHistory, OrderStatus,
    PaperSize, PrintSettings, PrintSettingsView, PrinterType, Principal, Role, UsagePeriod,
};
use crate::inbound::http::clients::{CreateClientRequest, UpdateClientRequest};
use crate::inbound::http::history::HistoryQuery;
use crate::inbound::http::login::LoginRequest;
use crate::inbound::http::print_settings::PrintSettingsRequest;
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::webhook::WebhookAccepted;

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Voice orders API",
        description = "Admin client management, business order dashboard and the call-event webhook."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::login::login,
        crate::inbound::http::login::logout,
        crate::inbound::http::login::current_session,
        crate::inbound::http::clients::list_clients,
        crate::inbound::http::clients::create_client,
        crate::inbound::http::clients::update_client,
        crate::inbound::http::clients::delete_client,
        crate::inbound::http::orders::list_active_orders,
        crate::inbound::http::orders::print_order,
        crate::inbound::http::orders::complete_order,
        crate::inbound::http::orders::delete_order,
        crate::inbound::http::history::order_history,
        crate::inbound::http::history::export_history_csv,
        crate::inbound::http::usage::call_usage,
        crate::inbound::http::print_settings::get_print_settings,
        crate::inbound::http::print_settings::update_print_settings,
        crate::inbound::http::webhook::receive_call,
        crate::inbound::http::webhook::preflight,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        Principal,
        LoginRequest,
        ClientSummary,
        CreateClientRequest,
        UpdateClientRequest,
        Order,
        OrderStatus,
        ActiveOrders,
        OrderHistory,
        HistorySummary,
        HistoryQuery,
        CallUsage,
        UsagePeriod,
        PrintSettings,
        PrintSettingsView,
        PrintSettingsRequest,
        PrinterType,
        PaperSize,
        WebhookAccepted,
    )),
    tags(
        (name = "auth", description = "Sign-in and session"),
        (name = "admin", description = "Business client management"),
        (name = "orders", description = "Live order board"),
        (name = "history", description = "Completed orders and CSV export"),
        (name = "usage", description = "Call usage and billing"),
        (name = "print-settings", description = "Receipt printing preferences"),
        (name = "webhook", description = "Voice provider call events"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
