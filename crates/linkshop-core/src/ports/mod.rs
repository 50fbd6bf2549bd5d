//! Port traits (interfaces) for dependency injection

pub mod media;
pub mod storage;

pub use media::{ImageUpload, MediaHost};
pub use storage::{CategoryStore, ProductStore, ProfileStore, SocialStore, Storage};
