//! HTTP error mapping

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use linkshop_core::ShopError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Shop(#[from] ShopError),

    #[error("parse multipart: {0}")]
    Multipart(#[from] MultipartError),

    #[error("parse multipart: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    #[error("invalid json: {0}")]
    Json(#[from] JsonRejection),

    #[error("forbidden")]
    Forbidden,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Shop(ShopError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Shop(ShopError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Shop(ShopError::Unauthorized) => StatusCode::UNAUTHORIZED,
            AppError::Shop(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Multipart(_) | AppError::MultipartRejection(_) | AppError::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ShopError::validation("title required"), StatusCode::BAD_REQUEST),
            (ShopError::NotFound("product"), StatusCode::NOT_FOUND),
            (ShopError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ShopError::Database("locked".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ShopError::Upload("timeout".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_messages_are_plain_text() {
        assert_eq!(
            AppError::from(ShopError::NotFound("product")).to_string(),
            "product not found"
        );
        assert_eq!(AppError::from(ShopError::Unauthorized).to_string(), "unauthorized");
    }
}
