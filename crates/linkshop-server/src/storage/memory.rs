//! In-memory store used in development mode (no database required)

use super::{default_profile, DEV_CATEGORIES};
use async_trait::async_trait;
use chrono::Utc;
use linkshop_core::ports::{CategoryStore, ProductStore, ProfileStore, SocialStore, Storage};
use linkshop_core::{
    Category, NewProduct, NewSocial, Product, ProductUpdate, Profile, Result, ShopError, Social,
    SocialUpdate,
};
use tokio::sync::Mutex;

/// Mutex-guarded collections mirroring the SQL tables.
///
/// The lock covers one collection operation at a time and is never held
/// across an await on anything else.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    /// Newest first
    products: Vec<Product>,
    categories: Vec<Category>,
    socials: Vec<Social>,
    profile: Profile,
    next_product_id: i64,
    next_category_id: i64,
    next_social_id: i64,
}

impl Inner {
    fn category_name(&self, id: Option<i64>) -> String {
        id.and_then(|id| self.categories.iter().find(|c| c.id == id))
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    /// Copy of a product with its category name filled in
    fn resolved(&self, product: &Product) -> Product {
        let mut product = product.clone();
        product.category = self.category_name(product.category_id);
        product
    }

    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.categories
            .iter()
            .any(|c| c.name == name && Some(c.id) != except)
    }
}

impl MemoryStore {
    /// Empty store holding only the default profile
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                products: Vec::new(),
                categories: Vec::new(),
                socials: Vec::new(),
                profile: default_profile(),
                next_product_id: 1,
                next_category_id: 1,
                next_social_id: 1,
            }),
        }
    }

    /// Store pre-filled with sample categories and social links
    pub fn seeded() -> Self {
        let categories: Vec<Category> = DEV_CATEGORIES
            .iter()
            .zip(1..)
            .map(|(name, id)| Category {
                id,
                name: name.to_string(),
            })
            .collect();
        let socials = vec![
            Social {
                id: 1,
                name: "Instagram".to_string(),
                url: "https://www.instagram.com/".to_string(),
                icon: "instagram.png".to_string(),
                ord: 1,
            },
            Social {
                id: 2,
                name: "Facebook".to_string(),
                url: "https://www.facebook.com/".to_string(),
                icon: "facebook.png".to_string(),
                ord: 2,
            },
        ];

        Self {
            inner: Mutex::new(Inner {
                products: Vec::new(),
                next_category_id: categories.len() as i64 + 1,
                next_social_id: socials.len() as i64 + 1,
                categories,
                socials,
                profile: default_profile(),
                next_product_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let inner = self.inner.lock().await;
        Ok(inner.products.iter().map(|p| inner.resolved(p)).collect())
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| inner.resolved(p)))
    }

    async fn insert_product(&self, product: &NewProduct) -> Result<i64> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_product_id;
        inner.next_product_id += 1;

        let stored = Product {
            id,
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: product.image.url.clone(),
            image_public_id: product.image.public_id.clone(),
            external_url: product.external_url.clone(),
            tag: product.tag,
            category_id: product.category_id,
            category: String::new(),
            created_at: Utc::now(),
        };
        inner.products.insert(0, stored);
        Ok(id)
    }

    async fn update_product(&self, id: i64, update: &ProductUpdate) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        match inner.products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                update.apply_to(product);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_product(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        let before = inner.products.len();
        inner.products.retain(|p| p.id != id);
        Ok(inner.products.len() != before)
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let inner = self.inner.lock().await;
        let mut categories = inner.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let inner = self.inner.lock().await;
        Ok(inner.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_category(&self, name: &str) -> Result<Category> {
        let mut inner = self.inner.lock().await;
        if inner.name_taken(name, None) {
            return Err(ShopError::validation("category already exists"));
        }
        let category = Category {
            id: inner.next_category_id,
            name: name.to_string(),
        };
        inner.next_category_id += 1;
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn rename_category(&self, id: i64, name: &str) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        if !inner.categories.iter().any(|c| c.id == id) {
            return Ok(false);
        }
        if inner.name_taken(name, Some(id)) {
            return Err(ShopError::validation("category already exists"));
        }
        if let Some(category) = inner.categories.iter_mut().find(|c| c.id == id) {
            category.name = name.to_string();
        }
        Ok(true)
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        let before = inner.categories.len();
        inner.categories.retain(|c| c.id != id);
        if inner.categories.len() == before {
            return Ok(false);
        }
        for product in inner.products.iter_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl SocialStore for MemoryStore {
    async fn list_socials(&self) -> Result<Vec<Social>> {
        let inner = self.inner.lock().await;
        let mut socials = inner.socials.clone();
        socials.sort_by_key(|s| (s.ord, s.id));
        Ok(socials)
    }

    async fn get_social(&self, id: i64) -> Result<Option<Social>> {
        let inner = self.inner.lock().await;
        Ok(inner.socials.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_social(&self, social: &NewSocial) -> Result<Social> {
        let mut inner = self.inner.lock().await;
        let social = Social {
            id: inner.next_social_id,
            name: social.name.clone(),
            url: social.url.clone(),
            icon: social.icon.clone(),
            ord: social.ord,
        };
        inner.next_social_id += 1;
        inner.socials.push(social.clone());
        Ok(social)
    }

    async fn update_social(&self, id: i64, update: &SocialUpdate) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        match inner.socials.iter_mut().find(|s| s.id == id) {
            Some(social) => {
                update.apply_to(social);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_social(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        let before = inner.socials.len();
        inner.socials.retain(|s| s.id != id);
        Ok(inner.socials.len() != before)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self) -> Result<Profile> {
        Ok(self.inner.lock().await.profile.clone())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.profile = Profile {
            socials: Vec::new(),
            ..profile.clone()
        };
        Ok(())
    }
}

impl Storage for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::RecordingHost;
    use linkshop_core::ports::ImageUpload;
    use linkshop_core::{Catalog, Price, ProductDraft, Tag};
    use std::sync::Arc;

    fn catalog() -> (Catalog, Arc<RecordingHost>) {
        let media = Arc::new(RecordingHost::default());
        (
            Catalog::new(Arc::new(MemoryStore::new()), media.clone()),
            media,
        )
    }

    fn draft(title: &str) -> ProductDraft {
        ProductDraft {
            title: title.to_string(),
            price: Price::from_cents(1000),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_products_listed_newest_first() {
        let (catalog, _) = catalog();
        catalog.create_product(draft("first"), None).await.unwrap();
        catalog.create_product(draft("second"), None).await.unwrap();
        catalog.create_product(draft("third"), None).await.unwrap();

        let titles: Vec<String> = catalog
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_list_returns_copies() {
        let store = MemoryStore::new();
        store
            .insert_product(&NewProduct {
                title: "Scarf".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let mut listed = store.list_products().await.unwrap();
        listed[0].title = "Changed".to_string();

        let again = store.list_products().await.unwrap();
        assert_eq!(again[0].title, "Scarf");
    }

    #[tokio::test]
    async fn test_shopee_link_round_trip_and_mychoice_clears() {
        let (catalog, _) = catalog();
        let shopee = catalog
            .create_product(
                ProductDraft {
                    tag: Some(Tag::Shopee),
                    external_url: "https://shopee.vn/item/1".to_string(),
                    ..draft("Bag")
                },
                None,
            )
            .await
            .unwrap();
        let fetched = catalog.get_product(shopee.id).await.unwrap();
        assert_eq!(fetched.tag, Tag::Shopee);
        assert_eq!(fetched.external_url, "https://shopee.vn/item/1");

        let mine = catalog
            .create_product(
                ProductDraft {
                    tag: Some(Tag::MyChoice),
                    external_url: "https://shopee.vn/item/2".to_string(),
                    ..draft("Hat")
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(mine.external_url, "");

        let switched = catalog
            .update_product(
                shopee.id,
                ProductUpdate {
                    tag: Some(Tag::MyChoice),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(switched.tag, Tag::MyChoice);
        assert_eq!(switched.external_url, "");
    }

    #[tokio::test]
    async fn test_shopee_requires_link() {
        let (catalog, _) = catalog();
        let err = catalog
            .create_product(
                ProductDraft {
                    tag: Some(Tag::Shopee),
                    ..draft("Bag")
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));

        let product = catalog.create_product(draft("Bag"), None).await.unwrap();
        let err = catalog
            .update_product(
                product.id,
                ProductUpdate {
                    tag: Some(Tag::Shopee),
                    external_url: Some(String::new()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }

    #[tokio::test]
    async fn test_shopee_update_keeps_stored_link() {
        let (catalog, _) = catalog();
        let product = catalog
            .create_product(
                ProductDraft {
                    tag: Some(Tag::Shopee),
                    external_url: "https://shopee.vn/item/9".to_string(),
                    ..draft("Bag")
                },
                None,
            )
            .await
            .unwrap();

        let updated = catalog
            .update_product(
                product.id,
                ProductUpdate {
                    tag: Some(Tag::Shopee),
                    external_url: Some(String::new()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(updated.external_url, "https://shopee.vn/item/9");
    }

    #[tokio::test]
    async fn test_price_only_update_leaves_other_fields() {
        let (catalog, _) = catalog();
        let category = catalog.create_category("Shoes").await.unwrap();
        let product = catalog
            .create_product(
                ProductDraft {
                    description: "Leather".to_string(),
                    category_id: Some(category.id),
                    tag: Some(Tag::Shopee),
                    external_url: "https://shopee.vn/boots".to_string(),
                    ..draft("Boots")
                },
                None,
            )
            .await
            .unwrap();

        let updated = catalog
            .update_product(
                product.id,
                ProductUpdate {
                    price: Some(Price::from_cents(4599)),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(updated.price, Price::from_cents(4599));
        assert_eq!(updated.title, "Boots");
        assert_eq!(updated.description, "Leather");
        assert_eq!(updated.category_id, Some(category.id));
        assert_eq!(updated.category, "Shoes");
        assert_eq!(updated.tag, Tag::Shopee);
        assert_eq!(updated.external_url, "https://shopee.vn/boots");
        assert_eq!(updated.created_at, product.created_at);
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let (catalog, _) = catalog();
        let err = catalog
            .create_product(
                ProductDraft {
                    category_id: Some(42),
                    ..draft("Bag")
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_to_unknown_category_is_rejected() {
        let (catalog, _) = catalog();
        let shoes = catalog.create_category("Shoes").await.unwrap();
        let product = catalog
            .create_product(
                ProductDraft {
                    category_id: Some(shoes.id),
                    ..draft("Boots")
                },
                None,
            )
            .await
            .unwrap();

        let err = catalog
            .update_product(
                product.id,
                ProductUpdate {
                    category_id: Some(Some(999)),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));

        let stored = catalog.get_product(product.id).await.unwrap();
        assert_eq!(stored.category_id, Some(shoes.id));
        assert_eq!(stored.category, "Shoes");
    }

    #[tokio::test]
    async fn test_rename_missing_category_to_taken_name() {
        let (catalog, _) = catalog();
        catalog.create_category("Shoes").await.unwrap();
        let err = catalog.rename_category(99, "Shoes").await.unwrap_err();
        assert!(matches!(err, ShopError::NotFound("category")));
    }

    #[tokio::test]
    async fn test_delete_category_clears_products() {
        let (catalog, _) = catalog();
        let category = catalog.create_category("Dresses").await.unwrap();
        let other = catalog.create_category("Hats").await.unwrap();
        for title in ["a", "b", "c"] {
            catalog
                .create_product(
                    ProductDraft {
                        category_id: Some(category.id),
                        ..draft(title)
                    },
                    None,
                )
                .await
                .unwrap();
        }
        let kept = catalog
            .create_product(
                ProductDraft {
                    category_id: Some(other.id),
                    ..draft("d")
                },
                None,
            )
            .await
            .unwrap();

        catalog.delete_category(category.id).await.unwrap();

        let products = catalog.list_products().await.unwrap();
        let cleared = products.iter().filter(|p| p.category_id.is_none()).count();
        assert_eq!(cleared, 3);
        assert!(products
            .iter()
            .filter(|p| p.category_id.is_none())
            .all(|p| p.category.is_empty()));
        assert_eq!(
            catalog.get_product(kept.id).await.unwrap().category,
            "Hats"
        );
        let categories = catalog.list_categories().await.unwrap();
        assert!(categories.iter().all(|c| c.id != category.id));

        let err = catalog.delete_category(category.id).await.unwrap_err();
        assert!(matches!(err, ShopError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rename_category_reflects_on_products() {
        let (catalog, _) = catalog();
        let category = catalog.create_category("Shoe").await.unwrap();
        let product = catalog
            .create_product(
                ProductDraft {
                    category_id: Some(category.id),
                    ..draft("Sneakers")
                },
                None,
            )
            .await
            .unwrap();
        catalog.rename_category(category.id, " Shoes ").await.unwrap();
        assert_eq!(catalog.get_product(product.id).await.unwrap().category, "Shoes");
    }

    #[tokio::test]
    async fn test_duplicate_category_name() {
        let (catalog, _) = catalog();
        catalog.create_category("Shoes").await.unwrap();
        let err = catalog.create_category("Shoes").await.unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
        let err = catalog.create_category("   ").await.unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_product() {
        let (catalog, _) = catalog();
        let err = catalog
            .update_product(
                7,
                ProductUpdate {
                    title: Some("x".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::NotFound(_)));
        let err = catalog.delete_product(7).await.unwrap_err();
        assert!(matches!(err, ShopError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_product_removes_hosted_image() {
        let (catalog, media) = catalog();
        let upload = ImageUpload {
            filename: "a.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![1, 2, 3],
        };
        let product = catalog.create_product(draft("Bag"), Some(upload)).await.unwrap();
        assert_eq!(product.image_public_id, "img-1");

        catalog.delete_product(product.id).await.unwrap();
        assert_eq!(media.destroyed(), vec!["img-1".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_image_cleanup_does_not_block_delete() {
        let (catalog, media) = catalog();
        let product = catalog
            .create_product(draft("Bag"), Some(ImageUpload::default()))
            .await
            .unwrap();
        media.fail_destroy(true);

        catalog.delete_product(product.id).await.unwrap();
        assert!(catalog.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replacing_image_discards_old_one() {
        let (catalog, media) = catalog();
        let product = catalog
            .create_product(draft("Bag"), Some(ImageUpload::default()))
            .await
            .unwrap();
        let updated = catalog
            .update_product(product.id, ProductUpdate::default(), Some(ImageUpload::default()))
            .await
            .unwrap();

        assert_eq!(updated.image_public_id, "img-2");
        assert_eq!(media.destroyed(), vec!["img-1".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let (catalog, _) = catalog();
        let product = catalog.create_product(draft("Bag"), None).await.unwrap();
        let err = catalog
            .update_product(product.id, ProductUpdate::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }

    #[tokio::test]
    async fn test_socials_ordered_and_partially_updated() {
        let (catalog, _) = catalog();
        let tiktok = catalog
            .create_social(NewSocial {
                name: "TikTok".to_string(),
                url: "https://tiktok.com/@shop".to_string(),
                icon: "tiktok.png".to_string(),
                ord: 3,
            })
            .await
            .unwrap();
        catalog
            .create_social(NewSocial {
                name: "Instagram".to_string(),
                url: "https://instagram.com/shop".to_string(),
                icon: String::new(),
                ord: 1,
            })
            .await
            .unwrap();

        let names: Vec<String> = catalog
            .list_socials()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Instagram", "TikTok"]);

        let updated = catalog
            .update_social(
                tiktok.id,
                SocialUpdate {
                    ord: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.ord, 0);
        assert_eq!(updated.url, "https://tiktok.com/@shop");
        assert_eq!(catalog.list_socials().await.unwrap()[0].name, "TikTok");

        let err = catalog
            .create_social(NewSocial {
                name: "Blank".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }

    #[tokio::test]
    async fn test_profile_update_keeps_avatar_and_attaches_socials() {
        let store = Arc::new(MemoryStore::seeded());
        let media = Arc::new(RecordingHost::default());
        let catalog = Catalog::new(store, media.clone());

        let profile = catalog.get_profile().await.unwrap();
        assert_eq!(profile.socials.len(), 2);

        let first = catalog
            .update_profile(
                linkshop_core::ProfileUpdate {
                    display_name: "Shop".to_string(),
                    ..Default::default()
                },
                Some(ImageUpload::default()),
            )
            .await
            .unwrap();
        assert_eq!(first.avatar_url, "https://media.test/img-1");

        let second = catalog
            .update_profile(
                linkshop_core::ProfileUpdate {
                    display_name: "Shop 2".to_string(),
                    bio: " new bio ".to_string(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(second.avatar_url, "https://media.test/img-1");
        assert_eq!(second.bio, "new bio");
        assert!(media.destroyed().is_empty());

        catalog
            .update_profile(
                linkshop_core::ProfileUpdate {
                    display_name: "Shop 3".to_string(),
                    ..Default::default()
                },
                Some(ImageUpload::default()),
            )
            .await
            .unwrap();
        assert_eq!(media.destroyed(), vec!["img-1".to_string()]);

        let err = catalog
            .update_profile(linkshop_core::ProfileUpdate::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }
}
