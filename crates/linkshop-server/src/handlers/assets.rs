//! Listing of bundled static images

use crate::error::AppError;
use crate::AppState;
use axum::{extract::State, Json};
use linkshop_core::ShopError;
use std::io::ErrorKind;
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "ico"];

pub async fn static_images(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let dir = state.config.static_dir.join("img");
    Ok(Json(list_images(&dir).await?))
}

/// Sorted image filenames directly under `dir`; a missing directory is empty.
pub async fn list_images(dir: &Path) -> Result<Vec<String>, ShopError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if let (true, Some(name)) = (is_image, entry.file_name().to_str()) {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}
