//! Media host stand-in for development mode

use async_trait::async_trait;
use linkshop_core::ports::{ImageUpload, MediaHost};
use linkshop_core::{ImageRef, Result};
use tracing::debug;

pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/800x600.png?text=DEV+IMAGE";

/// Accepts every upload and answers with a fixed placeholder image.
/// Nothing is stored, so there is never anything to destroy.
pub struct PlaceholderHost {
    url: String,
}

impl PlaceholderHost {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for PlaceholderHost {
    fn default() -> Self {
        Self::new(PLACEHOLDER_IMAGE_URL)
    }
}

#[async_trait]
impl MediaHost for PlaceholderHost {
    async fn upload(&self, image: ImageUpload) -> Result<ImageRef> {
        debug!(
            "Discarding {} byte upload '{}' in dev mode",
            image.bytes.len(),
            image.filename
        );
        Ok(ImageRef::new(&self.url, ""))
    }

    async fn destroy(&self, _public_id: &str) -> Result<()> {
        Ok(())
    }
}
