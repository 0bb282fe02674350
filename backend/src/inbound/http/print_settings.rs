//! Receipt print settings of the signed-in business.
//!
//! ```text
//! GET /api/v1/business/print-settings
//! PUT /api/v1/business/print-settings {"printerType":"thermal","printCopies":2}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Error, PrintSettingsPatch, PrintSettingsView};

use super::ApiResult;
use super::auth::require_business;
use super::session::SessionContext;
use super::state::HttpState;

/// Settings form body; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintSettingsRequest {
    /// `thermal`, `inkjet` or `laser`.
    pub printer_type: Option<String>,
    /// `80mm`, `58mm` or `a4`.
    pub paper_size: Option<String>,
    pub include_timestamp: Option<bool>,
    pub include_customer_info: Option<bool>,
    pub include_business_logo: Option<bool>,
    /// 1 to 3.
    pub print_copies: Option<i64>,
    pub auto_print: Option<bool>,
}

impl From<PrintSettingsRequest> for PrintSettingsPatch {
    fn from(value: PrintSettingsRequest) -> Self {
        Self {
            printer_type: value.printer_type,
            paper_size: value.paper_size,
            include_timestamp: value.include_timestamp,
            include_customer_info: value.include_customer_info,
            include_business_logo: value.include_business_logo,
            print_copies: value.print_copies,
            auto_print: value.auto_print,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/business/print-settings",
    responses(
        (status = 200, description = "Stored settings or defaults", body = PrintSettingsView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["print-settings"],
    operation_id = "getPrintSettings"
)]
#[get("/business/print-settings")]
pub async fn get_print_settings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PrintSettingsView>> {
    let business = require_business(&session, &state).await?;
    let view = state
        .print_settings_query
        .print_settings(&business.account_id)
        .await?;
    Ok(web::Json(view))
}

#[utoipa::path(
    put,
    path = "/api/v1/business/print-settings",
    request_body = PrintSettingsRequest,
    responses(
        (status = 200, description = "Saved settings", body = PrintSettingsView),
        (status = 400, description = "Invalid settings", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["print-settings"],
    operation_id = "updatePrintSettings"
)]
#[put("/business/print-settings")]
pub async fn update_print_settings(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PrintSettingsRequest>,
) -> ApiResult<web::Json<PrintSettingsView>> {
    let business = require_business(&session, &state).await?;
    let view = state
        .print_settings
        .update_print_settings(&business.account_id, payload.into_inner().into())
        .await?;
    info!(business_id = %business.account_id, "print settings saved");
    Ok(web::Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPrintSettingsCommand, MockPrintSettingsQuery};
    use crate::domain::{AccountId, PrintSettings, Principal, Role};
    use crate::inbound::http::test_utils::{
        MockPorts, SIGN_IN_PATH, resolving_login, sign_in, sign_in_route,
        test_session_middleware,
    };
    use actix_web::cookie::Cookie;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    fn business() -> Principal {
        Principal {
            account_id: AccountId::new("22222222-2222-4222-8222-222222222222")
                .expect("fixture id"),
            username: "spice".to_owned(),
            role: Role::Business,
            business_name: Some("Spice Route".to_owned()),
            is_active: true,
        }
    }

    async fn signed_in_app(
        mut ports: MockPorts,
    ) -> (
        impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
        Cookie<'static>,
    ) {
        ports.login = resolving_login(business());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .wrap(test_session_middleware())
                .route(SIGN_IN_PATH, sign_in_route(business()))
                .service(
                    web::scope("/api/v1")
                        .service(get_print_settings)
                        .service(update_print_settings),
                ),
        )
        .await;
        let cookie = sign_in(&app).await;
        (app, cookie)
    }

    #[actix_web::test]
    async fn defaults_are_flattened_with_auto_print() {
        let mut query = MockPrintSettingsQuery::new();
        query.expect_print_settings().returning(|_| {
            Ok(PrintSettingsView {
                settings: PrintSettings::default(),
                auto_print: true,
            })
        });
        let (app, cookie) = signed_in_app(MockPorts {
            print_settings_query: query,
            ..MockPorts::default()
        })
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/business/print-settings")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["printerType"], "thermal");
        assert_eq!(body["paperSize"], "80mm");
        assert_eq!(body["printCopies"], 1);
        assert_eq!(body["autoPrint"], true);
    }

    #[actix_web::test]
    async fn update_passes_the_raw_patch_through() {
        let mut command = MockPrintSettingsCommand::new();
        command
            .expect_update_print_settings()
            .withf(|_, patch| {
                patch.paper_size.as_deref() == Some("58mm")
                    && patch.print_copies == Some(2)
                    && patch.auto_print == Some(false)
                    && patch.printer_type.is_none()
            })
            .times(1)
            .returning(|_, _| {
                Ok(PrintSettingsView {
                    settings: PrintSettings::default(),
                    auto_print: false,
                })
            });
        let (app, cookie) = signed_in_app(MockPorts {
            print_settings: command,
            ..MockPorts::default()
        })
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/business/print-settings")
                .cookie(cookie)
                .set_json(json!({ "paperSize": "58mm", "printCopies": 2, "autoPrint": false }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn invalid_settings_surface_as_bad_requests() {
        let mut command = MockPrintSettingsCommand::new();
        command
            .expect_update_print_settings()
            .returning(|_, _| Err(Error::invalid_request("printCopies must be between 1 and 3")));
        let (app, cookie) = signed_in_app(MockPorts {
            print_settings: command,
            ..MockPorts::default()
        })
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/business/print-settings")
                .cookie(cookie)
                .set_json(json!({ "printCopies": 9 }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
