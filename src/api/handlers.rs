use actix_web::{web, HttpResponse};

use super::AppState;
use crate::domain::order::{OrderError, OrderRequest, StatusRequest};

// ============================================================================
// Order Handlers
// ============================================================================
//
// Thin adapters: pull input out of the request, call the handler, shape the
// response. Errors become responses through `ResponseError`.
//
// ============================================================================

pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<OrderRequest>,
) -> Result<HttpResponse, OrderError> {
    let created = state
        .observe("create", state.commands.create(body.into_inner()))
        .await?;

    state.metrics.orders_created.inc();
    Ok(HttpResponse::Created().json(created))
}

pub async fn list_all(state: web::Data<AppState>) -> Result<HttpResponse, OrderError> {
    let orders = state.observe("list_all", state.queries.list_all()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// `statuses` is a comma-separated list, e.g. `received,in_preparation`.
pub async fn list_by_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, OrderError> {
    let filter: Vec<&str> = path.split(',').collect();
    let orders = state
        .observe("list_by_status", state.queries.list_by_status(&filter))
        .await?;
    Ok(HttpResponse::Ok().json(orders))
}

pub async fn order_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, OrderError> {
    let order = state
        .observe("detail", state.queries.find_by_id(&path))
        .await?;
    Ok(HttpResponse::Ok().json(order))
}

pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<StatusRequest>,
) -> Result<HttpResponse, OrderError> {
    let applied = state
        .observe(
            "update_status",
            state.commands.apply_status(&body.status, &path),
        )
        .await?;

    state
        .metrics
        .status_updates
        .with_label_values(&[applied.as_str()])
        .inc();

    Ok(HttpResponse::Ok().json(StatusRequest {
        status: applied.to_string(),
    }))
}
