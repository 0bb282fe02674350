//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::{ServerConfig, Storage};
#[cfg(feature = "metrics")]
pub use metrics::default_metrics;
pub use state_builders::ensure_bootstrap_admin;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use voice_orders::Trace;
#[cfg(debug_assertions)]
use voice_orders::doc::ApiDoc;
use voice_orders::inbound::http::configure_api;
use voice_orders::inbound::http::health::{HealthState, live, ready};
use voice_orders::inbound::http::session_config::SessionSettings;
use voice_orders::inbound::http::state::HttpState;
use voice_orders::inbound::http::webhook;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;

    let api = web::scope("/api/v1")
        .wrap(session.middleware())
        .configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .configure(webhook::configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let ServerConfig {
        session,
        bind_addr,
        #[cfg(feature = "metrics")]
        prometheus,
        ..
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            session: session.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests;
