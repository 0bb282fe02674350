//! Session helpers keeping handlers free of actix-session details.
//!
//! The cookie stores only the account id and role. Everything else about the
//! principal is re-read from the account store on each request, so
//! deactivating or deleting an account takes effect immediately.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AccountId, Error, Principal, Role};

pub(crate) const ACCOUNT_ID_KEY: &str = "account_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Identity carried by the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIdentity {
    pub account_id: AccountId,
    pub role: Role,
}

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the signed-in principal, rotating the session id.
    pub fn persist_principal(&self, principal: &Principal) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACCOUNT_ID_KEY, principal.account_id.to_string())
            .and_then(|()| self.0.insert(ROLE_KEY, principal.role.as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The identity in the cookie, if present and well formed.
    pub fn identity(&self) -> Result<Option<SessionIdentity>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(raw_role)) = (read(ACCOUNT_ID_KEY)?, read(ROLE_KEY)?) else {
            return Ok(None);
        };
        match (AccountId::new(&raw_id), raw_role.parse::<Role>()) {
            (Ok(account_id), Ok(role)) => Ok(Some(SessionIdentity { account_id, role })),
            _ => {
                warn!("discarding malformed session cookie");
                self.purge();
                Ok(None)
            }
        }
    }

    /// Require a signed-in identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<SessionIdentity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    const ACCOUNT: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn principal() -> Principal {
        Principal {
            account_id: AccountId::new(ACCOUNT).expect("fixture id"),
            username: "spice".to_owned(),
            role: Role::Business,
            business_name: Some("Spice Route".to_owned()),
            is_active: true,
        }
    }

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let identity = session.require_identity()?;
        Ok(HttpResponse::Ok().body(format!("{}:{}", identity.account_id, identity.role)))
    }

    #[actix_web::test]
    async fn round_trips_the_identity() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_principal(&principal())?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route("/who", web::get().to(whoami)),
        )
        .await;

        let set = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = session_cookie(&set);
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/who").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, format!("{ACCOUNT}:business"));
    }

    #[actix_web::test]
    async fn missing_identity_is_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/who", web::get().to(whoami)),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/who").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_values_are_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(ACCOUNT_ID_KEY, "not-a-uuid")
                            .and_then(|()| session.insert(ROLE_KEY, "superuser"))
                            .expect("set invalid identity");
                        HttpResponse::Ok()
                    }),
                )
                .route("/who", web::get().to(whoami)),
        )
        .await;

        let set = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/who")
                .cookie(session_cookie(&set))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
