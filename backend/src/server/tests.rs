//! Tests for server construction: readiness signalling and the route table.

use super::*;
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::http::{StatusCode, header};
use actix_web::test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use voice_orders::outbound::security::BcryptPasswordHasher;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn session() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        ttl: Duration::hours(1),
    }
}

#[fixture]
fn config(session: SessionSettings) -> ServerConfig {
    ServerConfig::new(session, "127.0.0.1:0".parse().expect("literal"))
        .with_hasher(BcryptPasswordHasher::new(4).expect("minimum cost is valid"))
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(health_state: web::Data<HealthState>, config: ServerConfig) {
    assert!(!health_state.is_ready(), "state should start unready");

    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[cfg(feature = "metrics")]
#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready_with_metrics(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) {
    let config = config.with_metrics(metrics::initialize_metrics(|| {
        actix_web_prom::PrometheusMetricsBuilder::new("test")
            .endpoint("/metrics")
            .build()
    }));

    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(health_state.is_ready());
}

#[cfg(feature = "metrics")]
#[actix_rt::test]
async fn initialize_metrics_returns_none_on_error() {
    let built = metrics::initialize_metrics(|| -> Result<_, &str> { Err("boom") });
    assert!(built.is_none());
}

#[rstest]
#[actix_web::test]
async fn app_routes_reach_every_surface(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
    session: SessionSettings,
) {
    health_state.mark_ready();
    let app = test::init_service(build_app(AppDependencies {
        health_state,
        http_state: web::Data::new(build_http_state(&config)),
        session,
    }))
    .await;

    let readiness =
        test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
            .await;
    assert_eq!(readiness.status(), StatusCode::OK);

    let anonymous = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/auth/session").to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    assert!(anonymous.headers().contains_key("trace-id"));

    let preflight = test::call_service(
        &app,
        test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/webhooks/calls")
            .to_request(),
    )
    .await;
    assert_eq!(preflight.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_web::test]
async fn malformed_login_json_uses_the_error_envelope(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
    session: SessionSettings,
) {
    let app = test::init_service(build_app(AppDependencies {
        health_state,
        http_state: web::Data::new(build_http_state(&config)),
        session,
    }))
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"username\":")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], json!("invalid_request"));
}
