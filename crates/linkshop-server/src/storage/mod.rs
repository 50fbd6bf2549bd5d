//! Storage layer
//!
//! `Database` is the durable SQLite backend; `MemoryStore` is the in-process
//! development backend selected by `DEV_MODE`.

pub mod db;
pub mod memory;

pub use db::Database;
pub use memory::MemoryStore;

use linkshop_core::Profile;

/// Profile used when nothing has been saved yet
pub fn default_profile() -> Profile {
    Profile {
        display_name: "Linkshop".to_string(),
        username: "@linkshop".to_string(),
        bio: "Curated closet, shipped within 48h".to_string(),
        highlight: "Message us on Instagram to order!".to_string(),
        ..Default::default()
    }
}

/// Categories the development backend starts with
pub const DEV_CATEGORIES: &[&str] = &["Clothing", "Dresses", "Shoes"];
