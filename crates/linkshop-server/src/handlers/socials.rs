//! Social link handlers

use crate::error::AppError;
use crate::extractors::AdminGuard;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use linkshop_core::{NewSocial, Social, SocialUpdate};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Social>>, AppError> {
    Ok(Json(state.catalog.list_socials().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Social>, AppError> {
    Ok(Json(state.catalog.get_social(id).await?))
}

pub async fn create(
    _admin: AdminGuard,
    State(state): State<AppState>,
    req: Result<Json<NewSocial>, JsonRejection>,
) -> Result<Json<Social>, AppError> {
    let Json(social) = req?;
    Ok(Json(state.catalog.create_social(social).await?))
}

pub async fn update(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    req: Result<Json<SocialUpdate>, JsonRejection>,
) -> Result<Json<Social>, AppError> {
    let Json(update) = req?;
    Ok(Json(state.catalog.update_social(id, update).await?))
}

pub async fn delete(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_social(id).await?;
    Ok(StatusCode::OK)
}
