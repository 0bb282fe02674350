//! Admin endpoints for business-client accounts.
//!
//! ```text
//! GET    /api/v1/admin/clients
//! POST   /api/v1/admin/clients
//! PATCH  /api/v1/admin/clients/{id}
//! DELETE /api/v1/admin/clients/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{ClientDraft, ClientPatch, ClientSummary, ClientUpdate, Error, NewClient};

use super::ApiResult;
use super::auth::require_admin;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, client_validation_error, parse_account_id};

const CLIENT_ID: FieldName = FieldName::new("id");

/// Body of `POST /api/v1/admin/clients`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub username: String,
    pub business_name: String,
    pub password: String,
    /// Rupees per billable minute; defaults to 2.00.
    pub call_rate: Option<f64>,
    pub auto_print: Option<bool>,
    pub logo_url: Option<String>,
    pub webhook_url: Option<String>,
}

impl CreateClientRequest {
    fn draft(&self) -> ClientDraft<'_> {
        ClientDraft {
            username: &self.username,
            business_name: &self.business_name,
            password: &self.password,
            call_rate: self.call_rate,
            auto_print: self.auto_print,
            logo_url: self.logo_url.as_deref(),
            webhook_url: self.webhook_url.as_deref(),
        }
    }
}

/// Body of `PATCH /api/v1/admin/clients/{id}`. Omitted fields are kept; an
/// empty URL clears it.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    pub business_name: Option<String>,
    pub call_rate: Option<f64>,
    pub auto_print: Option<bool>,
    pub is_active: Option<bool>,
    pub logo_url: Option<String>,
    pub webhook_url: Option<String>,
    /// New password; leave out to keep the current one.
    pub password: Option<String>,
}

impl UpdateClientRequest {
    fn patch(&self) -> ClientPatch<'_> {
        ClientPatch {
            business_name: self.business_name.as_deref(),
            call_rate: self.call_rate,
            auto_print: self.auto_print,
            is_active: self.is_active,
            logo_url: self.logo_url.as_deref(),
            webhook_url: self.webhook_url.as_deref(),
            password: self.password.as_deref(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/clients",
    responses(
        (status = 200, description = "Business clients, newest first", body = [ClientSummary]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listClients"
)]
#[get("/admin/clients")]
pub async fn list_clients(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ClientSummary>>> {
    require_admin(&session, &state).await?;
    let clients = state.clients_query.list_clients().await?;
    Ok(web::Json(clients))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = ClientSummary),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Username already exists", body = Error)
    ),
    tags = ["admin"],
    operation_id = "createClient"
)]
#[post("/admin/clients")]
pub async fn create_client(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateClientRequest>,
) -> ApiResult<HttpResponse> {
    let admin = require_admin(&session, &state).await?;
    let client = NewClient::try_from_draft(payload.draft()).map_err(client_validation_error)?;
    let created = state.clients.create_client(client).await?;
    info!(admin_id = %admin.account_id, business_id = %created.id, "client created");
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/clients/{id}",
    params(("id" = String, Path, description = "Client account id")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ClientSummary),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown client", body = Error)
    ),
    tags = ["admin"],
    operation_id = "updateClient"
)]
#[patch("/admin/clients/{id}")]
pub async fn update_client(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateClientRequest>,
) -> ApiResult<web::Json<ClientSummary>> {
    require_admin(&session, &state).await?;
    let id = parse_account_id(&path, CLIENT_ID)?;
    let update = ClientUpdate::try_from_patch(payload.patch()).map_err(client_validation_error)?;
    let updated = state.clients.update_client(&id, update).await?;
    Ok(web::Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/clients/{id}",
    params(("id" = String, Path, description = "Client account id")),
    responses(
        (status = 204, description = "Client and its orders deleted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown client", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deleteClient"
)]
#[delete("/admin/clients/{id}")]
pub async fn delete_client(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let admin = require_admin(&session, &state).await?;
    let id = parse_account_id(&path, CLIENT_ID)?;
    state.clients.delete_client(&id).await?;
    info!(admin_id = %admin.account_id, business_id = %id, "client deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockClientsCommand;
    use crate::domain::{AccountId, ErrorCode, Principal, Role};
    use crate::inbound::http::test_utils::{
        MockPorts, SIGN_IN_PATH, resolving_login, sign_in, sign_in_route,
        test_session_middleware,
    };
    use actix_web::cookie::Cookie;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::{Value, json};

    const ADMIN: &str = "11111111-1111-4111-8111-111111111111";
    const CLIENT: &str = "22222222-2222-4222-8222-222222222222";

    fn principal(role: Role) -> Principal {
        Principal {
            account_id: AccountId::new(ADMIN).expect("fixture id"),
            username: "root".to_owned(),
            role,
            business_name: None,
            is_active: true,
        }
    }

    fn summary() -> ClientSummary {
        ClientSummary {
            id: AccountId::new(CLIENT).expect("fixture id"),
            username: "spice".to_owned(),
            business_name: "Spice Route".to_owned(),
            call_rate: 2.5,
            call_rate_paise: 250,
            auto_print: true,
            is_active: true,
            logo_url: None,
            webhook_url: None,
            created_at: Utc::now(),
            total_calls: 0,
            total_minutes: 0,
            total_revenue_paise: 0,
        }
    }

    async fn signed_in_app(
        role: Role,
        mut ports: MockPorts,
    ) -> (
        impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
        Cookie<'static>,
    ) {
        ports.login = resolving_login(principal(role));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .wrap(test_session_middleware())
                .route(SIGN_IN_PATH, sign_in_route(principal(role)))
                .service(
                    web::scope("/api/v1")
                        .service(list_clients)
                        .service(create_client)
                        .service(update_client)
                        .service(delete_client),
                ),
        )
        .await;
        let cookie = sign_in(&app).await;
        (app, cookie)
    }

    #[actix_web::test]
    async fn create_returns_created() {
        let mut clients = MockClientsCommand::new();
        clients
            .expect_create_client()
            .withf(|client| client.username.as_ref() == "spice" && client.password() == "s3cret!")
            .times(1)
            .returning(|_| Ok(summary()));
        let ports = MockPorts {
            clients,
            ..MockPorts::default()
        };
        let (app, cookie) = signed_in_app(Role::Admin, ports).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/admin/clients")
                .cookie(cookie)
                .set_json(json!({
                    "username": "spice",
                    "businessName": "Spice Route",
                    "password": "s3cret!",
                    "callRate": 2.5
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["id"], CLIENT);
        assert_eq!(body["callRatePaise"], 250);
    }

    #[rstest]
    #[case(json!({"username": "spice", "businessName": "Spice", "password": "123"}), "password", "password_too_short")]
    #[case(json!({"username": "spice", "businessName": "Spice", "password": "s3cret!", "webhookUrl": "ftp://x"}), "webhookUrl", "invalid_url")]
    #[actix_web::test]
    async fn invalid_drafts_name_the_field(
        #[case] body: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let (app, cookie) = signed_in_app(Role::Admin, MockPorts::default()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/admin/clients")
                .cookie(cookie)
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let error: Error = test::read_body_json(res).await;
        let details = error.details().expect("details");
        assert_eq!(details["field"], field);
        assert_eq!(details["code"], code);
    }

    #[actix_web::test]
    async fn business_sessions_are_forbidden() {
        let (app, cookie) = signed_in_app(Role::Business, MockPorts::default()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/admin/clients")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn update_forwards_the_patch() {
        let mut clients = MockClientsCommand::new();
        clients
            .expect_update_client()
            .withf(|id, update| id.to_string() == CLIENT && update.is_active == Some(false))
            .times(1)
            .returning(|_, _| {
                Ok(ClientSummary {
                    is_active: false,
                    ..summary()
                })
            });
        let ports = MockPorts {
            clients,
            ..MockPorts::default()
        };
        let (app, cookie) = signed_in_app(Role::Admin, ports).await;
        let res = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/v1/admin/clients/{CLIENT}"))
                .cookie(cookie)
                .set_json(json!({ "isActive": false }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["isActive"], false);
    }

    #[actix_web::test]
    async fn delete_of_unknown_client_is_not_found() {
        let mut clients = MockClientsCommand::new();
        clients
            .expect_delete_client()
            .returning(|_| Err(Error::not_found("client not found")));
        let ports = MockPorts {
            clients,
            ..MockPorts::default()
        };
        let (app, cookie) = signed_in_app(Role::Admin, ports).await;
        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/admin/clients/{CLIENT}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let error: Error = test::read_body_json(res).await;
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[actix_web::test]
    async fn malformed_ids_are_rejected() {
        let (app, cookie) = signed_in_app(Role::Admin, MockPorts::default()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/api/v1/admin/clients/not-a-uuid")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
