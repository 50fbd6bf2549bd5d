//! Admin page and the POST-based delete shortcuts

use crate::error::AppError;
use crate::extractors::auth::{is_admin, session_cookie, TokenQuery};
use crate::extractors::AdminGuard;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use linkshop_core::ShopError;
use serde::Deserialize;
use std::io::ErrorKind;
use tracing::info;

const ADMIN_PAGE: &str = "admin.html";

#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: i64,
}

pub async fn delete_product(
    _admin: AdminGuard,
    State(state): State<AppState>,
    req: Result<Json<IdRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(req) = req?;
    state.catalog.delete_product(req.id).await?;
    Ok(StatusCode::OK)
}

pub async fn delete_category(
    _admin: AdminGuard,
    State(state): State<AppState>,
    req: Result<Json<IdRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(req) = req?;
    state.catalog.delete_category(req.id).await?;
    Ok(StatusCode::OK)
}

/// Serve the admin page to admins. A matching `?token=` also logs the
/// caller in by setting the session cookie.
pub async fn page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
) -> Result<Response, AppError> {
    let admin_token = state.config.admin_token.as_deref();

    if is_admin(&headers, None, admin_token) {
        return Ok(load_page(&state).await?.into_response());
    }

    let token_matches = admin_token
        .filter(|t| !t.is_empty())
        .is_some_and(|t| query.token.as_deref() == Some(t));
    if token_matches {
        info!("Admin session started via token");
        let page = load_page(&state).await?;
        return Ok(([(header::SET_COOKIE, session_cookie())], page).into_response());
    }

    Err(AppError::Forbidden)
}

async fn load_page(state: &AppState) -> Result<Html<String>, AppError> {
    let path = state.config.static_dir.join(ADMIN_PAGE);
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Ok(Html(body)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ShopError::NotFound("admin page").into()),
        Err(e) => Err(ShopError::from(e).into()),
    }
}
