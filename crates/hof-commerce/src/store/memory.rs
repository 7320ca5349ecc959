//! In-process store.

use super::{CatalogStore, OrderStore, SettingsStore};
use crate::catalog::{default_categories, starter_products, Category, Product};
use crate::checkout::{Order, OrderDraft, OrderReceipt, OrderStatus};
use crate::error::PersistenceError;
use crate::ids::{CategoryId, OrderId, ProductId};
use crate::money::Currency;
use crate::settings::{SettingsPatch, StoreSettings};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct State {
    /// Insertion order; listings reverse it where newest-first is required.
    products: Vec<Product>,
    categories: Vec<Category>,
    orders: Vec<Order>,
    settings: StoreSettings,
}

/// Keeps every record in memory behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// An empty store with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the default categories and the starter catalog.
    pub fn seeded(currency: Currency) -> Self {
        let mut products = starter_products(currency);
        // Listing is newest first; keep the catalog's own order on screen.
        products.reverse();
        Self {
            state: RwLock::new(State {
                products,
                categories: default_categories(),
                orders: Vec::new(),
                settings: StoreSettings::default(),
            }),
        }
    }
}

fn not_found(kind: &str, id: &str) -> PersistenceError {
    PersistenceError::NotFound(format!("{kind} {id}"))
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, PersistenceError> {
        let state = self.state.read().await;
        Ok(state.products.iter().rev().cloned().collect())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, PersistenceError> {
        let state = self.state.read().await;
        Ok(state.products.iter().find(|p| &p.id == id).cloned())
    }

    async fn create_product(&self, product: &Product) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        if state.products.iter().any(|p| p.id == product.id) {
            return Err(PersistenceError::Conflict(format!("product {}", product.id)));
        }
        state.products.push(product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        let existing = state
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| not_found("product", product.id.as_str()))?;
        *existing = product.clone();
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        let before = state.products.len();
        state.products.retain(|p| &p.id != id);
        if state.products.len() == before {
            return Err(not_found("product", id.as_str()));
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, PersistenceError> {
        Ok(self.state.read().await.categories.clone())
    }

    async fn create_category(&self, category: &Category) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        if state
            .categories
            .iter()
            .any(|c| c.id == category.id || c.slug == category.slug)
        {
            return Err(PersistenceError::Conflict(format!("category {}", category.slug)));
        }
        state.categories.push(category.clone());
        Ok(())
    }

    async fn update_category(&self, category: &Category) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        if state
            .categories
            .iter()
            .any(|c| c.id != category.id && c.slug == category.slug)
        {
            return Err(PersistenceError::Conflict(format!("category {}", category.slug)));
        }
        let existing = state
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or_else(|| not_found("category", category.id.as_str()))?;
        *existing = category.clone();
        Ok(())
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        let before = state.categories.len();
        state.categories.retain(|c| &c.id != id);
        if state.categories.len() == before {
            return Err(not_found("category", id.as_str()));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn list_orders(&self) -> Result<Vec<Order>, PersistenceError> {
        let state = self.state.read().await;
        Ok(state.orders.iter().rev().cloned().collect())
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderReceipt, PersistenceError> {
        let receipt = OrderReceipt {
            id: OrderId::generate(),
            created_at: Utc::now(),
        };
        let order = Order::from_draft(draft.clone(), receipt.clone());
        self.state.write().await.orders.push(order);
        Ok(receipt)
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| not_found("order", id.as_str()))?;
        order.status = status;
        Ok(())
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        let before = state.orders.len();
        state.orders.retain(|o| &o.id != id);
        if state.orders.len() == before {
            return Err(not_found("order", id.as_str()));
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load_settings(&self) -> Result<StoreSettings, PersistenceError> {
        Ok(self.state.read().await.settings.clone())
    }

    async fn save_settings(&self, patch: &SettingsPatch) -> Result<(), PersistenceError> {
        self.state.write().await.settings.apply(patch);
        Ok(())
    }
}
