//! Product handlers

use super::form::{parse_category_field, FormFields};
use crate::error::AppError;
use crate::extractors::AdminGuard;
use crate::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use linkshop_core::ports::ImageUpload;
use linkshop_core::{Price, Product, ProductDraft, ProductUpdate, Tag};
use serde::Serialize;

const IMAGE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct CreatedProduct {
    pub id: i64,
    pub image_url: String,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.catalog.list_products().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.catalog.get_product(id).await?))
}

pub async fn create(
    _admin: AdminGuard,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CreatedProduct>, AppError> {
    let form = FormFields::read(multipart?, IMAGE_FIELD).await?;
    let (draft, image) = draft_from_form(form);

    let product = state.catalog.create_product(draft, image).await?;
    Ok(Json(CreatedProduct {
        id: product.id,
        image_url: product.image_url,
    }))
}

pub async fn update(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<StatusCode, AppError> {
    let mut form = FormFields::read(multipart?, IMAGE_FIELD).await?;
    let image = form.image.take();

    state
        .catalog
        .update_product(id, update_from_form(&form), image)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn delete(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_product(id).await?;
    Ok(StatusCode::OK)
}

/// Creation input. Unparseable price or category fall back to zero / none.
fn draft_from_form(mut form: FormFields) -> (ProductDraft, Option<ImageUpload>) {
    let image = form.image.take();
    let draft = ProductDraft {
        title: form.text("title"),
        description: form.text("description"),
        price: form.get("price").and_then(Price::parse).unwrap_or(Price::ZERO),
        category_id: form
            .get("category_id")
            .and_then(parse_category_field)
            .flatten(),
        external_url: form.text("external_url"),
        tag: form.get("tag").and_then(Tag::from_input),
    };
    (draft, image)
}

/// Fields present in the form are updated; malformed numbers are skipped.
fn update_from_form(form: &FormFields) -> ProductUpdate {
    ProductUpdate {
        title: form.owned("title"),
        description: form.owned("description"),
        price: form.get("price").and_then(Price::parse),
        image: None,
        external_url: form.owned("external_url"),
        tag: form.get("tag").and_then(Tag::from_input),
        category_id: form.get("category_id").and_then(parse_category_field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults_malformed_numbers() {
        let form = FormFields::from_pairs(&[
            ("title", "Linen shirt"),
            ("price", "abc"),
            ("category_id", "x"),
            ("tag", "Shopee"),
            ("external_url", "https://shopee.example/1"),
        ]);
        let (draft, image) = draft_from_form(form);
        assert_eq!(draft.price, Price::ZERO);
        assert_eq!(draft.category_id, None);
        assert_eq!(draft.tag, Some(Tag::Shopee));
        assert!(image.is_none());
    }

    #[test]
    fn test_update_only_touches_submitted_fields() {
        let form = FormFields::from_pairs(&[("price", "19.9")]);
        let update = update_from_form(&form);
        assert_eq!(update.price, Some(Price::from_cents(1990)));
        assert!(update.title.is_none());
        assert!(update.category_id.is_none());
        assert!(update.tag.is_none());
    }

    #[test]
    fn test_update_skips_malformed_price_and_clears_blank_category() {
        let form = FormFields::from_pairs(&[("price", "-"), ("category_id", "")]);
        let update = update_from_form(&form);
        assert!(update.price.is_none());
        assert_eq!(update.category_id, Some(None));
    }
}
