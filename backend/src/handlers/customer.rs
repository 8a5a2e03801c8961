//! HTTP handlers for customer management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::models::{Customer, CustomerPatch, NewCustomer};
use shared::types::SearchQuery;

use super::DeletedResponse;
use crate::error::AppResult;
use crate::services::CustomerService;
use crate::AppState;

/// List customers, optionally filtered by `?search=`
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.store);
    Ok(Json(service.list(&query).await?))
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<NewCustomer>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let service = CustomerService::new(state.store);
    let customer = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.store);
    Ok(Json(service.get(customer_id).await?))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(patch): Json<CustomerPatch>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.store);
    Ok(Json(service.update(customer_id, patch).await?))
}

/// Delete a customer together with its orders
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<DeletedResponse>> {
    let service = CustomerService::new(state.store);
    let removed_orders = service.delete(customer_id).await?;
    Ok(Json(DeletedResponse {
        id: customer_id,
        removed_orders,
    }))
}
