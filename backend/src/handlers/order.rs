//! HTTP handlers for rental orders

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::models::{NewOrder, Order, OrderFilter, OrderPatch};

use crate::error::AppResult;
use crate::services::OrderService;
use crate::AppState;

fn order_service(state: AppState) -> OrderService {
    OrderService::new(state.store, &state.config.stock)
}

/// List orders, optionally filtered by `?search=` and `?status=`
pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(order_service(state).list(&filter).await?))
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<NewOrder>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = order_service(state).create_order(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    Ok(Json(order_service(state).get(order_id).await?))
}

pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(patch): Json<OrderPatch>,
) -> AppResult<Json<Order>> {
    Ok(Json(order_service(state).update_order(order_id, patch).await?))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    order_service(state).delete_order(order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
