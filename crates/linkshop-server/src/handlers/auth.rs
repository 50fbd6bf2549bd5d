//! Login and logout

use crate::error::AppError;
use crate::extractors::auth::{expired_session_cookie, session_cookie};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use linkshop_core::ShopError;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    req: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = req?;
    let (username, password) = state.config.admin_credentials();

    if req.username != username || req.password != password {
        warn!("Failed login attempt for {:?}", req.username);
        return Err(ShopError::Unauthorized.into());
    }

    info!("Admin logged in");
    Ok((StatusCode::OK, [(header::SET_COOKIE, session_cookie())]))
}

pub async fn logout() -> impl IntoResponse {
    (StatusCode::OK, [(header::SET_COOKIE, expired_session_cookie())])
}
