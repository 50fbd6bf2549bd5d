//! Linkshop Types - plain data shared by the storage backends and the HTTP layer
//!
//! Nothing in here touches a database, the network or an async runtime.

pub mod catalog;
pub mod product;
pub mod profile;

pub use catalog::*;
pub use product::*;
pub use profile::*;

use serde::{Deserialize, Serialize};

/// A hosted image: the public URL plus the media host's reference id used to delete it later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub public_id: String,
}

impl ImageRef {
    pub fn new(url: impl Into<String>, public_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            public_id: public_id.into(),
        }
    }
}
