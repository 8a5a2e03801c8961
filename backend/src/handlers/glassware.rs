//! HTTP handlers for the glassware catalog

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::models::{Glassware, GlasswarePatch, NewGlassware};
use shared::types::SearchQuery;

use super::DeletedResponse;
use crate::error::AppResult;
use crate::services::GlasswareService;
use crate::AppState;

fn glassware_service(state: AppState) -> GlasswareService {
    GlasswareService::new(state.store, &state.config.stock)
}

pub async fn list_glassware(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Glassware>>> {
    Ok(Json(glassware_service(state).list(&query).await?))
}

pub async fn create_glassware(
    State(state): State<AppState>,
    Json(input): Json<NewGlassware>,
) -> AppResult<(StatusCode, Json<Glassware>)> {
    let item = glassware_service(state).create(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_glassware(
    State(state): State<AppState>,
    Path(glassware_id): Path<Uuid>,
) -> AppResult<Json<Glassware>> {
    Ok(Json(glassware_service(state).get(glassware_id).await?))
}

pub async fn update_glassware(
    State(state): State<AppState>,
    Path(glassware_id): Path<Uuid>,
    Json(patch): Json<GlasswarePatch>,
) -> AppResult<Json<Glassware>> {
    Ok(Json(glassware_service(state).update(glassware_id, patch).await?))
}

/// Delete a catalog item together with its orders
pub async fn delete_glassware(
    State(state): State<AppState>,
    Path(glassware_id): Path<Uuid>,
) -> AppResult<Json<DeletedResponse>> {
    let removed_orders = glassware_service(state).delete(glassware_id).await?;
    Ok(Json(DeletedResponse {
        id: glassware_id,
        removed_orders,
    }))
}
