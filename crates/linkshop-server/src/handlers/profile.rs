//! Profile handlers

use super::form::FormFields;
use crate::error::AppError;
use crate::extractors::AdminGuard;
use crate::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use linkshop_core::{Profile, ProfileUpdate};

const AVATAR_FIELD: &str = "avatar";

pub async fn get(State(state): State<AppState>) -> Result<Json<Profile>, AppError> {
    Ok(Json(state.catalog.get_profile().await?))
}

/// Replace the text fields; the avatar changes only when a file is sent.
pub async fn update(
    _admin: AdminGuard,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Profile>, AppError> {
    let mut form = FormFields::read(multipart?, AVATAR_FIELD).await?;
    let avatar = form.image.take();

    let update = ProfileUpdate {
        display_name: form.text("display_name"),
        username: form.text("username"),
        bio: form.text("bio"),
        highlight: form.text("highlight"),
    };

    Ok(Json(state.catalog.update_profile(update, avatar).await?))
}
