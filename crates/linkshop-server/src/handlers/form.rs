//! Multipart form reading shared by the product and profile handlers

use crate::error::AppError;
use axum::extract::Multipart;
use linkshop_core::ports::ImageUpload;
use std::collections::HashMap;
use tracing::debug;

/// Text fields of a multipart form plus the optional image part
#[derive(Debug, Default)]
pub struct FormFields {
    values: HashMap<String, String>,
    pub image: Option<ImageUpload>,
}

impl FormFields {
    /// Read every part; `file_field` names the image part.
    ///
    /// Browsers submit an empty part when no file was chosen, so parts
    /// without a filename or content are skipped.
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, AppError> {
        let mut form = FormFields::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if let Some(filename) = field.file_name().map(str::to_string) {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                if name != file_field || filename.is_empty() || bytes.is_empty() {
                    continue;
                }
                debug!("Received {} ({} bytes)", filename, bytes.len());
                form.image = Some(ImageUpload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
                continue;
            }

            let value = field.text().await?;
            form.values.entry(name).or_insert(value);
        }

        Ok(form)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    pub fn owned(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }
}

/// Interpret a submitted `category_id`.
///
/// `None` when the value is malformed (keep whatever is stored),
/// `Some(None)` for blank or zero (no category), `Some(Some(id))` otherwise.
pub fn parse_category_field(input: &str) -> Option<Option<i64>> {
    let input = input.trim();
    if input.is_empty() {
        return Some(None);
    }
    match input.parse::<i64>() {
        Ok(0) => Some(None),
        Ok(id) if id > 0 => Some(Some(id)),
        _ => None,
    }
}
