//! Media host port

use crate::{ImageRef, Result};
use async_trait::async_trait;

/// An image received from a client, not yet hosted anywhere
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// External image store
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Store the image and return its public URL and reference id
    async fn upload(&self, image: ImageUpload) -> Result<ImageRef>;

    /// Delete a previously uploaded image by reference id
    async fn destroy(&self, public_id: &str) -> Result<()>;
}
