//! Completed-order history and its CSV export.
//!
//! ```text
//! GET /api/v1/business/history?search=dosa&from=2026-04-01T00:00:00Z
//! GET /api/v1/business/history/export?search=dosa
//! ```

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, HistoryFilter, HistoryFilterError, OrderHistory};

use super::ApiResult;
use super::auth::require_business;
use super::cache_control::private_no_cache_header;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, invalid_range_error, parse_optional_rfc3339_timestamp};

const FROM: FieldName = FieldName::new("from");
const TO: FieldName = FieldName::new("to");
pub const CSV_FILENAME: &str = "order-history.csv";

/// Filters shared by the listing and the export.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct HistoryQuery {
    pub search: Option<String>,
    /// RFC 3339, inclusive.
    pub from: Option<String>,
    /// RFC 3339, inclusive.
    pub to: Option<String>,
}

impl HistoryQuery {
    fn filter(&self) -> Result<HistoryFilter, Error> {
        let from = parse_optional_rfc3339_timestamp(self.from.as_deref(), FROM)?;
        let to = parse_optional_rfc3339_timestamp(self.to.as_deref(), TO)?;
        HistoryFilter::new(self.search.as_deref(), from, to).map_err(|err| match err {
            HistoryFilterError::InvertedRange => invalid_range_error(FROM, err.to_string()),
        })
    }
}

async fn load_history(
    state: &HttpState,
    session: &SessionContext,
    query: &HistoryQuery,
) -> ApiResult<OrderHistory> {
    let business = require_business(session, state).await?;
    let filter = query.filter()?;
    state
        .orders_query
        .order_history(&business.account_id, &filter)
        .await
}

#[utoipa::path(
    get,
    path = "/api/v1/business/history",
    params(
        ("search" = Option<String>, Query, description = "Caller name, number, order text or id prefix"),
        ("from" = Option<String>, Query, description = "RFC 3339 lower bound, inclusive"),
        ("to" = Option<String>, Query, description = "RFC 3339 upper bound, inclusive")
    ),
    responses(
        (status = 200, description = "Completed orders with totals", body = OrderHistory),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["history"],
    operation_id = "orderHistory"
)]
#[get("/business/history")]
pub async fn order_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<HistoryQuery>,
) -> ApiResult<HttpResponse> {
    let history = load_history(&state, &session, &query).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(history))
}

#[utoipa::path(
    get,
    path = "/api/v1/business/history/export",
    params(
        ("search" = Option<String>, Query, description = "Caller name, number, order text or id prefix"),
        ("from" = Option<String>, Query, description = "RFC 3339 lower bound, inclusive"),
        ("to" = Option<String>, Query, description = "RFC 3339 upper bound, inclusive")
    ),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["history"],
    operation_id = "exportOrderHistory"
)]
#[get("/business/history/export")]
pub async fn export_history_csv(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<HistoryQuery>,
) -> ApiResult<HttpResponse> {
    let history = load_history(&state, &session, &query).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(CSV_FILENAME.to_owned())],
        })
        .insert_header((header::CONTENT_TYPE, "text/csv; charset=utf-8"))
        .body(history.to_csv()))
}
