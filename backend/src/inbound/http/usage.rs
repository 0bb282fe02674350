//! Call usage and billing dashboard for the signed-in business.

use actix_web::{HttpResponse, get, web};

use crate::domain::{CallUsage, Error};

use super::ApiResult;
use super::auth::require_business;
use super::cache_control::private_no_cache_header;
use super::session::SessionContext;
use super::state::HttpState;

#[utoipa::path(
    get,
    path = "/api/v1/business/usage",
    responses(
        (status = 200, description = "Today's and this month's usage", body = CallUsage),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["usage"],
    operation_id = "callUsage"
)]
#[get("/business/usage")]
pub async fn call_usage(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let business = require_business(&session, &state).await?;
    let usage = state.usage.call_usage(&business.account_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(usage))
}
