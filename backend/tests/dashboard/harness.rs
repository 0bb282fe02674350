//! App harness wiring real services over the in-memory store.

use std::sync::Arc;

use actix_http::Request;
use actix_web::cookie::{Cookie, Key, SameSite, time::Duration};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test, web};
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};
use voice_orders::Trace;
use voice_orders::domain::{
    AccountLoginService, AdminBootstrap, CallIngestionService, ClientService, OrderService,
    PrintSettingsService, UsageService,
};
use voice_orders::inbound::http::configure_api;
use voice_orders::inbound::http::session_config::SessionSettings;
use voice_orders::inbound::http::state::HttpState;
use voice_orders::inbound::http::webhook;
use voice_orders::outbound::memory::InMemoryStore;
use voice_orders::outbound::security::BcryptPasswordHasher;

pub const ADMIN_USERNAME: &str = "root";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const MONTHLY_LIMIT: u64 = 5000;

pub fn http_state(store: &InMemoryStore) -> HttpState {
    let accounts = Arc::new(store.accounts());
    let orders = Arc::new(store.orders());
    let hasher = Arc::new(BcryptPasswordHasher::new(4).expect("minimum cost is valid"));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let clients = Arc::new(ClientService::new(
        Arc::clone(&accounts),
        Arc::clone(&orders),
        Arc::clone(&hasher),
        Arc::clone(&clock),
    ));
    let order_service = Arc::new(OrderService::new(Arc::clone(&orders), Arc::clone(&clock)));
    let print_settings = Arc::new(PrintSettingsService::new(
        Arc::clone(&accounts),
        Arc::new(store.print_settings()),
    ));
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
        usage: Arc::new(UsageService::new(accounts, orders, clock, MONTHLY_LIMIT)),
        print_settings: print_settings.clone(),
        print_settings_query: print_settings,
    }
}

pub async fn seed_admin(store: &InMemoryStore) {
    AdminBootstrap::new(
        Arc::new(store.accounts()),
        Arc::new(BcryptPasswordHasher::new(4).expect("minimum cost is valid")),
        Arc::new(DefaultClock),
    )
    .ensure_admin(ADMIN_USERNAME, ADMIN_PASSWORD)
    .await
    .expect("seed admin");
}

fn session() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        ttl: Duration::hours(1),
    }
}

/// The production route table over `store`.
pub async fn app(
    store: &InMemoryStore,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = session();
    test::init_service(
        App::new()
            .app_data(web::Data::new(http_state(store)))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session.middleware())
                    .configure(configure_api),
            )
            .configure(webhook::configure),
    )
    .await
}

pub async fn login<S>(app: &S, username: &str, password: &str, role: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "username": username, "password": password, "role": role }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .next()
        .map(Cookie::into_owned)
        .expect("session cookie")
}

pub async fn login_admin<S>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    login(app, ADMIN_USERNAME, ADMIN_PASSWORD, "admin").await
}

/// Create a business through the admin API and return its id.
pub async fn create_business<S>(app: &S, admin: &Cookie<'static>, username: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/admin/clients")
            .cookie(admin.clone())
            .set_json(json!({
                "username": username,
                "businessName": format!("{username} kitchen"),
                "password": "biz-pass",
                "callRate": 2.5
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201);
    let body: Value = test::read_body_json(res).await;
    body["id"].as_str().expect("client id").to_owned()
}

/// Post one call event to the webhook and return the response status and body.
pub async fn post_call<S>(app: &S, business_id: &str, payload: Value) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/webhooks/calls?business_id={business_id}"))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload(payload.to_string())
            .to_request(),
    )
    .await;
    let status = res.status().as_u16();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

pub async fn get_json<S>(app: &S, uri: &str, cookie: &Cookie<'static>) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let status = res.status().as_u16();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}
