//! Storage seams.
//!
//! The domain talks to persistence only through these traits. `hof-db`
//! implements them over PostgreSQL; [`MemoryStore`] keeps everything in
//! process for tests and offline use.

mod memory;

pub use memory::MemoryStore;

use crate::catalog::{Category, Product};
use crate::checkout::{Order, OrderDraft, OrderReceipt, OrderStatus};
use crate::error::PersistenceError;
use crate::ids::{CategoryId, OrderId, ProductId};
use crate::settings::{SettingsPatch, StoreSettings};
use async_trait::async_trait;

/// Products and categories.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All products, newest first.
    async fn list_products(&self) -> Result<Vec<Product>, PersistenceError>;

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, PersistenceError>;

    async fn create_product(&self, product: &Product) -> Result<(), PersistenceError>;

    /// Replace every field of an existing product.
    async fn update_product(&self, product: &Product) -> Result<(), PersistenceError>;

    async fn delete_product(&self, id: &ProductId) -> Result<(), PersistenceError>;

    /// All categories, oldest first.
    async fn list_categories(&self) -> Result<Vec<Category>, PersistenceError>;

    async fn create_category(&self, category: &Category) -> Result<(), PersistenceError>;

    async fn update_category(&self, category: &Category) -> Result<(), PersistenceError>;

    async fn delete_category(&self, id: &CategoryId) -> Result<(), PersistenceError>;
}

/// Placed orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders with their lines, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, PersistenceError>;

    /// Store a draft and its lines, returning the assigned id and timestamp.
    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderReceipt, PersistenceError>;

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), PersistenceError>;

    /// Delete an order and its lines.
    async fn delete_order(&self, id: &OrderId) -> Result<(), PersistenceError>;
}

/// Key/value settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current settings; missing keys come back as defaults.
    async fn load_settings(&self) -> Result<StoreSettings, PersistenceError>;

    /// Upsert the set fields of a patch.
    async fn save_settings(&self, patch: &SettingsPatch) -> Result<(), PersistenceError>;
}
