//! Storage traits for persistence
//!
//! Both backends must return identically shaped results: products newest
//! first with the category name resolved, categories by name, socials by
//! `ord` then id.

use crate::{
    Category, NewProduct, NewSocial, Product, ProductUpdate, Profile, Result, Social, SocialUpdate,
};
use async_trait::async_trait;

/// Product store
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>>;
    async fn get_product(&self, id: i64) -> Result<Option<Product>>;
    /// Returns the new product id
    async fn insert_product(&self, product: &NewProduct) -> Result<i64>;
    /// Writes only the fields present in `update`. Returns false if the id is unknown.
    async fn update_product(&self, id: i64, update: &ProductUpdate) -> Result<bool>;
    async fn delete_product(&self, id: i64) -> Result<bool>;
}

/// Category store
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn get_category(&self, id: i64) -> Result<Option<Category>>;
    /// Fails with a validation error when the name is taken
    async fn insert_category(&self, name: &str) -> Result<Category>;
    async fn rename_category(&self, id: i64, name: &str) -> Result<bool>;
    /// Clears the category from every product, then removes it
    async fn delete_category(&self, id: i64) -> Result<bool>;
}

/// Social link store
#[async_trait]
pub trait SocialStore: Send + Sync {
    async fn list_socials(&self) -> Result<Vec<Social>>;
    async fn get_social(&self, id: i64) -> Result<Option<Social>>;
    async fn insert_social(&self, social: &NewSocial) -> Result<Social>;
    async fn update_social(&self, id: i64, update: &SocialUpdate) -> Result<bool>;
    async fn delete_social(&self, id: i64) -> Result<bool>;
}

/// Profile store (single record, socials not attached)
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self) -> Result<Profile>;
    async fn save_profile(&self, profile: &Profile) -> Result<()>;
}

/// A complete storage backend
pub trait Storage: ProductStore + CategoryStore + SocialStore + ProfileStore {
    /// Short name for logs
    fn backend_name(&self) -> &'static str;
}
