//! Catalog facade
//!
//! Every handler goes through [`Catalog`], which holds whichever [`Storage`]
//! backend was selected at startup plus the [`MediaHost`]. Validation, the
//! tag/link rule and image cleanup live here so both backends behave the same.

use crate::listing::resolve_external_url;
use crate::ports::{ImageUpload, MediaHost, Storage};
use crate::{
    Category, ImageRef, NewProduct, NewSocial, Price, Product, ProductUpdate, Profile,
    ProfileUpdate, Result, ShopError, Social, SocialUpdate, Tag,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Raw product fields from a create request
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category_id: Option<i64>,
    pub external_url: String,
    pub tag: Option<Tag>,
}

#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn Storage>,
    media: Arc<dyn MediaHost>,
}

impl Catalog {
    pub fn new(store: Arc<dyn Storage>, media: Arc<dyn MediaHost>) -> Self {
        Self { store, media }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    // Products

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.store.list_products().await
    }

    pub async fn get_product(&self, id: i64) -> Result<Product> {
        self.store
            .get_product(id)
            .await?
            .ok_or(ShopError::NotFound("product"))
    }

    pub async fn create_product(
        &self,
        draft: ProductDraft,
        image: Option<ImageUpload>,
    ) -> Result<Product> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(ShopError::validation("title required"));
        }
        if let Some(category_id) = draft.category_id {
            self.ensure_category(category_id).await?;
        }
        let tag = draft.tag.unwrap_or_default();
        let external_url = resolve_external_url(tag, Some(&draft.external_url), None)?;

        let image = match image {
            Some(upload) => self.media.upload(upload).await?,
            None => ImageRef::default(),
        };

        let new_product = NewProduct {
            title,
            description: draft.description,
            price: draft.price,
            image: image.clone(),
            external_url,
            tag,
            category_id: draft.category_id,
        };

        let id = match self.store.insert_product(&new_product).await {
            Ok(id) => id,
            Err(e) => {
                self.discard_image(Some(image)).await;
                return Err(e);
            }
        };
        info!("Created product {} ({})", id, new_product.title);

        self.get_product(id).await
    }

    pub async fn update_product(
        &self,
        id: i64,
        mut update: ProductUpdate,
        image: Option<ImageUpload>,
    ) -> Result<Product> {
        let current = self.get_product(id).await?;

        if let Some(title) = update.title.as_mut() {
            *title = title.trim().to_string();
            if title.is_empty() {
                return Err(ShopError::validation("title required"));
            }
        }
        if let Some(Some(category_id)) = update.category_id {
            self.ensure_category(category_id).await?;
        }
        if update.tag.is_some() || update.external_url.is_some() {
            let tag = update.tag.unwrap_or(current.tag);
            let external_url = resolve_external_url(
                tag,
                update.external_url.as_deref(),
                Some(&current.external_url),
            )?;
            update.tag = Some(tag);
            update.external_url = Some(external_url);
        }

        if update.is_empty() && image.is_none() {
            return Err(ShopError::validation("no fields to update"));
        }

        if let Some(upload) = image {
            update.image = Some(self.media.upload(upload).await?);
        }

        let updated = match self.store.update_product(id, &update).await {
            Ok(updated) => updated,
            Err(e) => {
                self.discard_image(update.image).await;
                return Err(e);
            }
        };
        if !updated {
            self.discard_image(update.image).await;
            return Err(ShopError::NotFound("product"));
        }
        debug!("Updated product {}", id);

        if update.image.is_some() {
            self.discard_image(current.image()).await;
        }

        self.get_product(id).await
    }

    /// Remove a product and, best-effort, its hosted image.
    pub async fn delete_product(&self, id: i64) -> Result<Product> {
        let current = self.get_product(id).await?;
        if !self.store.delete_product(id).await? {
            return Err(ShopError::NotFound("product"));
        }
        info!("Deleted product {}", id);

        self.discard_image(current.image()).await;
        Ok(current)
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.store.list_categories().await
    }

    pub async fn get_category(&self, id: i64) -> Result<Category> {
        self.store
            .get_category(id)
            .await?
            .ok_or(ShopError::NotFound("category"))
    }

    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let name = required(name, "name required")?;
        let category = self.store.insert_category(&name).await?;
        info!("Created category {} ({})", category.id, category.name);
        Ok(category)
    }

    pub async fn rename_category(&self, id: i64, name: &str) -> Result<Category> {
        let name = required(name, "name required")?;
        if !self.store.rename_category(id, &name).await? {
            return Err(ShopError::NotFound("category"));
        }
        Ok(Category { id, name })
    }

    pub async fn delete_category(&self, id: i64) -> Result<()> {
        if !self.store.delete_category(id).await? {
            return Err(ShopError::NotFound("category"));
        }
        info!("Deleted category {}", id);
        Ok(())
    }

    async fn ensure_category(&self, id: i64) -> Result<()> {
        match self.store.get_category(id).await? {
            Some(_) => Ok(()),
            None => Err(ShopError::validation("category not found")),
        }
    }

    // Socials

    pub async fn list_socials(&self) -> Result<Vec<Social>> {
        self.store.list_socials().await
    }

    pub async fn get_social(&self, id: i64) -> Result<Social> {
        self.store
            .get_social(id)
            .await?
            .ok_or(ShopError::NotFound("social"))
    }

    pub async fn create_social(&self, social: NewSocial) -> Result<Social> {
        let social = NewSocial {
            name: required(&social.name, "name required")?,
            url: required(&social.url, "url required")?,
            icon: social.icon.trim().to_string(),
            ord: social.ord,
        };
        self.store.insert_social(&social).await
    }

    pub async fn update_social(&self, id: i64, mut update: SocialUpdate) -> Result<Social> {
        if let Some(name) = update.name.as_deref() {
            update.name = Some(required(name, "name required")?);
        }
        if let Some(url) = update.url.as_deref() {
            update.url = Some(required(url, "url required")?);
        }
        if let Some(icon) = update.icon.as_mut() {
            *icon = icon.trim().to_string();
        }
        if update.is_empty() {
            return Err(ShopError::validation("no fields to update"));
        }
        if !self.store.update_social(id, &update).await? {
            return Err(ShopError::NotFound("social"));
        }
        self.get_social(id).await
    }

    pub async fn delete_social(&self, id: i64) -> Result<()> {
        if !self.store.delete_social(id).await? {
            return Err(ShopError::NotFound("social"));
        }
        Ok(())
    }

    // Profile

    /// The profile with its ordered social links attached.
    pub async fn get_profile(&self) -> Result<Profile> {
        let mut profile = self.store.get_profile().await?;
        profile.socials = self.store.list_socials().await?;
        Ok(profile)
    }

    pub async fn update_profile(
        &self,
        update: ProfileUpdate,
        avatar: Option<ImageUpload>,
    ) -> Result<Profile> {
        let display_name = required(&update.display_name, "display_name is required")?;
        let current = self.store.get_profile().await?;

        let new_avatar = match avatar {
            Some(upload) => Some(self.media.upload(upload).await?),
            None => None,
        };
        let (avatar_url, avatar_public_id) = match &new_avatar {
            Some(image) => (image.url.clone(), image.public_id.clone()),
            None => (current.avatar_url.clone(), current.avatar_public_id.clone()),
        };

        let profile = Profile {
            display_name,
            username: update.username.trim().to_string(),
            bio: update.bio.trim().to_string(),
            highlight: update.highlight.trim().to_string(),
            avatar_url,
            avatar_public_id,
            socials: Vec::new(),
        };

        if let Err(e) = self.store.save_profile(&profile).await {
            self.discard_image(new_avatar).await;
            return Err(e);
        }
        info!("Profile updated");

        if new_avatar.is_some() && current.avatar_public_id != profile.avatar_public_id {
            self.discard_image(current.avatar()).await;
        }

        self.get_profile().await
    }

    /// Best-effort delete on the media host; failures are only logged.
    async fn discard_image(&self, image: Option<ImageRef>) {
        let Some(image) = image else { return };
        if image.public_id.is_empty() {
            return;
        }
        match self.media.destroy(&image.public_id).await {
            Ok(()) => debug!("Removed hosted image {}", image.public_id),
            Err(e) => warn!("Failed to remove hosted image {}: {}", image.public_id, e),
        }
    }
}

fn required(value: &str, message: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ShopError::validation(message));
    }
    Ok(value.to_string())
}
