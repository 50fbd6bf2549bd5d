//! Keep-alive endpoint

use crate::error::AppError;
use crate::extractors::auth::TokenQuery;
use crate::AppState;
use axum::extract::{Query, State};
use linkshop_core::ShopError;

pub async fn ping(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<&'static str, AppError> {
    if let Some(expected) = state.config.self_ping_token.as_deref() {
        if query.token.as_deref() != Some(expected) {
            return Err(ShopError::Unauthorized.into());
        }
    }
    Ok("Pong\n")
}
