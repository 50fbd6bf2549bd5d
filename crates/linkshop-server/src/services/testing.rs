//! Test doubles

use async_trait::async_trait;
use linkshop_core::ports::{ImageUpload, MediaHost};
use linkshop_core::{ImageRef, Result, ShopError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Media host that hands out `img-N` ids and records every destroy call
#[derive(Default)]
pub struct RecordingHost {
    uploads: AtomicUsize,
    destroyed: Mutex<Vec<String>>,
    fail_destroy: AtomicBool,
}

impl RecordingHost {
    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }

    pub fn fail_destroy(&self, fail: bool) {
        self.fail_destroy.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaHost for RecordingHost {
    async fn upload(&self, _image: ImageUpload) -> Result<ImageRef> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ImageRef::new(
            format!("https://media.test/img-{}", n),
            format!("img-{}", n),
        ))
    }

    async fn destroy(&self, public_id: &str) -> Result<()> {
        if self.fail_destroy.load(Ordering::SeqCst) {
            return Err(ShopError::Upload("media host unavailable".to_string()));
        }
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}
