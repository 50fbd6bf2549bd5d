//! Linkshop Core Library
//!
//! Domain rules, storage and media ports, and the catalog facade that the
//! HTTP layer talks to.

// Re-export pure types from linkshop-types
pub use linkshop_types::*;

pub mod catalog;
pub mod error;
pub mod listing;
pub mod ports;

pub use catalog::{Catalog, ProductDraft};
pub use error::{Result, ShopError};
