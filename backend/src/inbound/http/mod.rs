//! HTTP inbound adapter exposing the dashboard and webhook endpoints.
//!
//! Handlers only talk to the driving ports held in [`state::HttpState`].

use actix_web::web;

pub mod auth;
pub mod cache_control;
pub mod clients;
pub mod error;
pub mod health;
pub mod history;
pub mod login;
pub mod orders;
pub mod print_settings;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod usage;
pub mod validation;
pub mod webhook;

pub use error::ApiResult;

/// Register the session-backed dashboard endpoints.
///
/// Mount inside a scope wrapped with the session middleware, normally
/// `/api/v1`. Malformed JSON bodies and query strings are answered with the
/// standard error envelope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(login::login)
        .service(login::logout)
        .service(login::current_session)
        .service(clients::list_clients)
        .service(clients::create_client)
        .service(clients::update_client)
        .service(clients::delete_client)
        .service(orders::list_active_orders)
        .service(orders::print_order)
        .service(orders::complete_order)
        .service(orders::delete_order)
        .service(history::order_history)
        .service(history::export_history_csv)
        .service(usage::call_usage)
        .service(print_settings::get_print_settings)
        .service(print_settings::update_print_settings);
}
