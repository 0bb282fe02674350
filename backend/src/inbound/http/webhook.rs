//! Call-completion webhook for the voice provider.
//!
//! ```text
//! POST    /webhooks/calls?business_id=<uuid>   {"from":"+91...","duration":75,...}
//! OPTIONS /webhooks/calls                      CORS preflight
//! ```
//!
//! The provider calls this without a session, so the business is named in the
//! query string. The response is sent only after the order is stored.

use actix_web::http::{Method, header};
use actix_web::middleware::DefaultHeaders;
use actix_web::web::Bytes;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::domain::{Error, OrderId};

use super::ApiResult;
use super::state::HttpState;
use super::validation::{FieldName, missing_field_error, parse_account_id};

pub const WEBHOOK_PATH: &str = "/webhooks/calls";
pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const BUSINESS_ID: FieldName = FieldName::new("business_id");

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct WebhookQuery {
    pub business_id: Option<String>,
}

/// Acknowledgement returned once the order row exists.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAccepted {
    pub success: bool,
    #[schema(value_type = String, format = Uuid)]
    pub order_id: OrderId,
}

fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, CORS_ALLOW_ORIGIN))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, CORS_ALLOW_HEADERS))
}

/// Mount the webhook resource; every response carries the CORS headers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(WEBHOOK_PATH)
            .wrap(cors_headers())
            .route(web::post().to(receive_call))
            .route(web::method(Method::OPTIONS).to(preflight))
            .default_service(web::to(method_not_allowed)),
    );
}

fn parse_payload(body: &[u8]) -> Result<Value, Error> {
    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, "rejected webhook with malformed JSON");
        Error::invalid_request("request body is not valid JSON")
    })
}

/// Store one call event as a new order.
#[utoipa::path(
    post,
    path = "/webhooks/calls",
    params(("business_id" = String, Query, description = "Receiving business account id")),
    request_body(content = Object, description = "Provider call event, stored verbatim"),
    responses(
        (status = 201, description = "Order stored", body = WebhookAccepted),
        (status = 400, description = "Missing or malformed business_id or body", body = Error),
        (status = 404, description = "Unknown or inactive business", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["webhook"],
    operation_id = "receiveCallEvent",
    security([])
)]
pub async fn receive_call(
    state: web::Data<HttpState>,
    query: web::Query<WebhookQuery>,
    body: Bytes,
) -> ApiResult<HttpResponse> {
    let raw_id = query
        .business_id
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| {
            warn!("rejected webhook without business_id");
            missing_field_error(BUSINESS_ID)
        })?;
    let business_id = parse_account_id(raw_id, BUSINESS_ID)?;
    let payload = parse_payload(&body)?;
    let order_id = state.calls.ingest(&business_id, payload).await?;
    info!(%business_id, %order_id, "webhook order stored");
    Ok(HttpResponse::Created().json(WebhookAccepted {
        success: true,
        order_id,
    }))
}

/// CORS preflight.
#[utoipa::path(
    options,
    path = "/webhooks/calls",
    responses((status = 204, description = "Preflight accepted")),
    tags = ["webhook"],
    operation_id = "webhookPreflight",
    security([])
)]
pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, "POST, OPTIONS"))
        .json(json!({ "error": "Method not allowed" }))
}
