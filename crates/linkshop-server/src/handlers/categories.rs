//! Category handlers

use crate::error::AppError;
use crate::extractors::AdminGuard;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use linkshop_core::Category;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.catalog.list_categories().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(state.catalog.get_category(id).await?))
}

pub async fn create(
    _admin: AdminGuard,
    State(state): State<AppState>,
    req: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<Json<Category>, AppError> {
    let Json(req) = req?;
    Ok(Json(state.catalog.create_category(&req.name).await?))
}

pub async fn rename(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    req: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<Json<Category>, AppError> {
    let Json(req) = req?;
    Ok(Json(state.catalog.rename_category(id, &req.name).await?))
}

pub async fn delete(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_category(id).await?;
    Ok(StatusCode::OK)
}
