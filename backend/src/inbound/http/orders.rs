//! Business order board: list, print, complete and delete.
//!
//! ```text
//! GET    /api/v1/business/orders
//! POST   /api/v1/business/orders/{id}/print
//! POST   /api/v1/business/orders/{id}/complete
//! DELETE /api/v1/business/orders/{id}
//! ```
//!
//! Every operation is scoped to the signed-in business. Another business's
//! order id is indistinguishable from an unknown one.

use actix_web::{HttpResponse, delete, get, post, web};
use tracing::info;

use crate::domain::ports::ActiveOrders;
use crate::domain::{Error, Order};

use super::ApiResult;
use super::auth::require_business;
use super::cache_control::private_no_cache_header;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, parse_order_id};

const ORDER_ID: FieldName = FieldName::new("id");

#[utoipa::path(
    get,
    path = "/api/v1/business/orders",
    responses(
        (status = 200, description = "New and printed orders, newest first", body = ActiveOrders),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listActiveOrders"
)]
#[get("/business/orders")]
pub async fn list_active_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let business = require_business(&session, &state).await?;
    let active = state.orders_query.active_orders(&business.account_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(active))
}

#[utoipa::path(
    post,
    path = "/api/v1/business/orders/{id}/print",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order marked printed", body = Order),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 409, description = "Order already completed", body = Error)
    ),
    tags = ["orders"],
    operation_id = "printOrder"
)]
#[post("/business/orders/{id}/print")]
pub async fn print_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Order>> {
    let business = require_business(&session, &state).await?;
    let id = parse_order_id(&path, ORDER_ID)?;
    let order = state.orders.print_order(&business.account_id, &id).await?;
    info!(business_id = %business.account_id, order_id = %id, "order printed");
    Ok(web::Json(order))
}

#[utoipa::path(
    post,
    path = "/api/v1/business/orders/{id}/complete",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order completed", body = Order),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 409, description = "Order has not been printed", body = Error)
    ),
    tags = ["orders"],
    operation_id = "completeOrder"
)]
#[post("/business/orders/{id}/complete")]
pub async fn complete_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Order>> {
    let business = require_business(&session, &state).await?;
    let id = parse_order_id(&path, ORDER_ID)?;
    let order = state.orders.complete_order(&business.account_id, &id).await?;
    info!(business_id = %business.account_id, order_id = %id, "order completed");
    Ok(web::Json(order))
}

#[utoipa::path(
    delete,
    path = "/api/v1/business/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 409, description = "Completed orders cannot be deleted", body = Error)
    ),
    tags = ["orders"],
    operation_id = "deleteOrder"
)]
#[delete("/business/orders/{id}")]
pub async fn delete_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let business = require_business(&session, &state).await?;
    let id = parse_order_id(&path, ORDER_ID)?;
    state.orders.delete_order(&business.account_id, &id).await?;
    info!(business_id = %business.account_id, order_id = %id, "order deleted");
    Ok(HttpResponse::NoContent().finish())
}
