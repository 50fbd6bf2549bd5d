//! Admin gate for mutating routes

use crate::error::AppError;
use crate::AppState;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header, request::Parts, HeaderMap},
};
use linkshop_core::ShopError;
use serde::Deserialize;
use tracing::debug;

pub const SESSION_COOKIE: &str = "session";
pub const SESSION_VALUE: &str = "admin";
pub const TOKEN_HEADER: &str = "X-Admin-Token";

/// Marker extracted by every admin handler; rejects with 401 otherwise
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard;

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let query = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .map(|Query(q)| q)
            .unwrap_or_default();

        if is_admin(
            &parts.headers,
            query.token.as_deref(),
            state.config.admin_token.as_deref(),
        ) {
            Ok(AdminGuard)
        } else {
            debug!("Rejected unauthenticated {} {}", parts.method, parts.uri.path());
            Err(ShopError::Unauthorized.into())
        }
    }
}

/// Session cookie, or a configured token in the header or query string
pub fn is_admin(headers: &HeaderMap, query_token: Option<&str>, admin_token: Option<&str>) -> bool {
    if has_session_cookie(headers) {
        return true;
    }

    let Some(expected) = admin_token.filter(|t| !t.is_empty()) else {
        return false;
    };

    let header_token = headers.get(TOKEN_HEADER).and_then(|h| h.to_str().ok());
    header_token == Some(expected) || query_token == Some(expected)
}

pub fn has_session_cookie(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == SESSION_COOKIE && value == SESSION_VALUE)
}

pub fn session_cookie() -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, SESSION_VALUE
    )
}

pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
