//! Product types

use crate::ImageRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed two-decimal price, stored as whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Largest accepted amount, in whole units
    const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// Parse user input such as `"19.99"` or `"120000"`.
    ///
    /// Returns `None` for anything that is not a finite, non-negative number
    /// up to one trillion.
    /// Extra precision is rounded to the nearest cent.
    pub fn parse(input: &str) -> Option<Self> {
        let value: f64 = input.trim().parse().ok()?;
        Self::from_f64(value)
    }

    fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 || value > Self::MAX_AMOUNT {
            return None;
        }
        Some(Self((value * 100.0).round() as i64))
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Price::from_f64(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid price: {}", value)))
    }
}

/// Product classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// Curated item sold directly; never carries an external link
    #[default]
    MyChoice,
    /// Marketplace item; must carry an external link
    Shopee,
}

impl Tag {
    /// Interpret a form value. Blank means "not supplied"; any value other
    /// than `shopee` is treated as `mychoice`.
    pub fn from_input(input: &str) -> Option<Self> {
        let value = input.trim();
        if value.is_empty() {
            None
        } else if value.eq_ignore_ascii_case("shopee") {
            Some(Tag::Shopee)
        } else {
            Some(Tag::MyChoice)
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::MyChoice => "mychoice",
            Tag::Shopee => "shopee",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
    pub image_public_id: String,
    pub external_url: String,
    pub tag: Tag,
    pub category_id: Option<i64>,
    /// Resolved category name, empty when uncategorized
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn image(&self) -> Option<ImageRef> {
        if self.image_public_id.is_empty() {
            return None;
        }
        Some(ImageRef::new(&self.image_url, &self.image_public_id))
    }
}

/// Fields for a new product, already validated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub image: ImageRef,
    pub external_url: String,
    pub tag: Tag,
    pub category_id: Option<i64>,
}

/// Partial product update. `None` leaves the stored value as is.
///
/// `category_id` is doubly optional: `Some(None)` clears the category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub image: Option<ImageRef>,
    pub external_url: Option<String>,
    pub tag: Option<Tag>,
    pub category_id: Option<Option<i64>>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.image.is_none()
            && self.external_url.is_none()
            && self.tag.is_none()
            && self.category_id.is_none()
    }

    /// Apply the present fields onto an in-memory product.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(title) = &self.title {
            product.title = title.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = &self.image {
            product.image_url = image.url.clone();
            product.image_public_id = image.public_id.clone();
        }
        if let Some(external_url) = &self.external_url {
            product.external_url = external_url.clone();
        }
        if let Some(tag) = self.tag {
            product.tag = tag;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
    }
}
