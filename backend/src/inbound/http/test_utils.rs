//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, Route, test, web};

use crate::domain::ports::{
    MockCallIngestion, MockCallUsageQuery, MockClientsCommand, MockClientsQuery,
    MockLoginService, MockOrdersCommand, MockOrdersQuery, MockPrintSettingsCommand,
    MockPrintSettingsQuery,
};

use crate::domain::{Error, Principal};

use super::session::SessionContext;
use super::state::HttpState;

pub const TEST_SESSION_COOKIE: &str = "session";

/// Session middleware with a fresh key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(TEST_SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// The session cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == TEST_SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

pub const SIGN_IN_PATH: &str = "/test/sign-in";

/// Route that stores `principal` in the session, standing in for a login.
pub fn sign_in_route(principal: Principal) -> Route {
    web::get().to(move |session: SessionContext| {
        let principal = principal.clone();
        async move {
            session.persist_principal(&principal)?;
            Ok::<_, Error>(HttpResponse::Ok())
        }
    })
}

/// Hit [`SIGN_IN_PATH`] and return the session cookie.
pub async fn sign_in<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, test::TestRequest::get().uri(SIGN_IN_PATH).to_request()).await;
    session_cookie(&res)
}

/// Login port that resolves every session to `principal`.
pub fn resolving_login(principal: Principal) -> MockLoginService {
    let mut login = MockLoginService::new();
    login
        .expect_resolve()
        .returning(move |_| Ok(Some(principal.clone())));
    login
}

/// One mock per driving port; unset expectations panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub clients: MockClientsCommand,
    pub clients_query: MockClientsQuery,
    pub orders: MockOrdersCommand,
    pub orders_query: MockOrdersQuery,
    pub calls: MockCallIngestion,
    pub usage: MockCallUsageQuery,
    pub print_settings: MockPrintSettingsCommand,
    pub print_settings_query: MockPrintSettingsQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            clients: Arc::new(self.clients),
            clients_query: Arc::new(self.clients_query),
            orders: Arc::new(self.orders),
            orders_query: Arc::new(self.orders_query),
            calls: Arc::new(self.calls),
            usage: Arc::new(self.usage),
            print_settings: Arc::new(self.print_settings),
            print_settings_query: Arc::new(self.print_settings_query),
        }
    }
}
