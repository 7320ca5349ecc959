//! Product types.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Image shown when a product has none.
pub const DEFAULT_IMAGE: &str = "/placeholder.svg";

/// Marketing tag attached to a product.
///
/// Badges never affect price or availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Bestseller,
    Promotion,
    New,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Bestseller => "bestseller",
            Badge::Promotion => "promotion",
            Badge::New => "new",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bestseller" => Some(Badge::Bestseller),
            "promotion" => Some(Badge::Promotion),
            "new" => Some(Badge::New),
            _ => None,
        }
    }

    /// Storefront label.
    pub fn label(&self) -> &'static str {
        match self {
            Badge::Bestseller => "Mais Vendido",
            Badge::Promotion => "Promoção",
            Badge::New => "Novo",
        }
    }

    pub fn all() -> [Badge; 3] {
        [Badge::Bestseller, Badge::Promotion, Badge::New]
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Short description shown on the card.
    pub description: String,
    /// Unit price.
    pub price: Money,
    /// Slug of the category this product belongs to.
    pub category: String,
    /// Image URI or path.
    pub image: String,
    /// Optional marketing badge.
    pub badge: Option<Badge>,
}

impl Product {
    /// Create a product with the default image and no badge.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            category: category.into(),
            image: DEFAULT_IMAGE.to_string(),
            badge: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_badge(mut self, badge: Badge) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Case-insensitive substring match over name and description.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

/// Input for creating a product from the admin panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub badge: Option<Badge>,
}

impl NewProduct {
    /// Materialize into a product with a generated id.
    pub fn into_product(self) -> Product {
        let image = match self.image {
            Some(image) if !image.trim().is_empty() => image,
            _ => DEFAULT_IMAGE.to_string(),
        };
        Product {
            id: ProductId::generate(),
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price,
            category: self.category,
            image,
            badge: self.badge,
        }
    }
}

/// Partial product update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub category: Option<String>,
    pub image: Option<String>,
    /// `Some(None)` clears the badge.
    pub badge: Option<Option<Badge>>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.image.is_none()
            && self.badge.is_none()
    }

    /// Apply the set fields to a product.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(image) = &self.image {
            product.image = if image.trim().is_empty() {
                DEFAULT_IMAGE.to_string()
            } else {
                image.clone()
            };
        }
        if let Some(badge) = self.badge {
            product.badge = badge;
        }
    }
}
