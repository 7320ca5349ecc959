//! Admin operations over the catalog, orders and settings.
//!
//! Every operation logs, reports success through the [`Notifier`], and on
//! failure logs, reports an error notice and returns the error. Nothing is
//! retried.

use crate::catalog::{CatalogFilter, Category, CategoryInput, NewProduct, Product, ProductUpdate};
use crate::checkout::{limit_whatsapp_digits, Order, OrderStatus, DEFAULT_TEMPLATE};
use crate::error::{CommerceError, PersistenceError, ValidationError};
use crate::ids::{CategoryId, OrderId, ProductId};
use crate::notify::Notifier;
use crate::settings::{SettingsPatch, SettingsService, StoreSettings};
use crate::store::{CatalogStore, OrderStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// A category and how many products reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryUsage {
    pub category: Category,
    pub products: usize,
}

/// Operator-facing service.
pub struct AdminPanel {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    settings: Arc<SettingsService>,
    notifier: Arc<dyn Notifier>,
}

impl AdminPanel {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        settings: Arc<SettingsService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            catalog,
            orders,
            settings,
            notifier,
        }
    }

    /// Report a rejected input.
    fn reject<T>(&self, err: ValidationError) -> Result<T, CommerceError> {
        warn!(code = err.code(), "Admin input rejected");
        self.notifier.error(&err.to_string());
        Err(err.into())
    }

    /// Map a storage result, reporting failures with `notice`.
    fn stored<T>(&self, result: Result<T, PersistenceError>, notice: &str) -> Result<T, CommerceError> {
        result.map_err(|e| {
            error!(error = %e, notice, "Storage call failed");
            self.notifier.error(notice);
            CommerceError::from(e)
        })
    }

    // ---- Products ----

    /// Products passing `filter`, newest first.
    pub async fn list_products(&self, filter: &CatalogFilter) -> Result<Vec<Product>, CommerceError> {
        let products = self.stored(self.catalog.list_products().await, "Erro ao carregar produtos")?;
        Ok(products.into_iter().filter(|p| filter.matches(p)).collect())
    }

    pub async fn add_product(&self, input: NewProduct) -> Result<Product, CommerceError> {
        if input.name.trim().is_empty() {
            return self.reject(ValidationError::MissingField("Nome"));
        }
        if input.category.trim().is_empty() {
            return self.reject(ValidationError::MissingField("Categoria"));
        }
        if input.price.is_negative() {
            return self.reject(ValidationError::NegativePrice);
        }

        let product = input.into_product();
        self.stored(
            self.catalog.create_product(&product).await,
            "Erro ao salvar produto",
        )?;
        info!(product_id = %product.id, name = %product.name, "Product created");
        self.notifier.success("Produto adicionado com sucesso!");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<Product, CommerceError> {
        if matches!(&update.name, Some(name) if name.trim().is_empty()) {
            return self.reject(ValidationError::MissingField("Nome"));
        }
        if update.price.is_some_and(|p| p.is_negative()) {
            return self.reject(ValidationError::NegativePrice);
        }

        let current = self.stored(self.catalog.get_product(id).await, "Erro ao salvar produto")?;
        let Some(mut product) = current else {
            self.notifier.error("Produto não encontrado");
            return Err(CommerceError::ProductNotFound(id.to_string()));
        };

        update.apply_to(&mut product);
        self.stored(
            self.catalog.update_product(&product).await,
            "Erro ao salvar produto",
        )?;
        info!(product_id = %product.id, "Product updated");
        self.notifier.success("Produto atualizado com sucesso!");
        Ok(product)
    }

    pub async fn delete_product(&self, id: &ProductId) -> Result<(), CommerceError> {
        self.stored(self.catalog.delete_product(id).await, "Erro ao excluir produto")?;
        info!(product_id = %id, "Product deleted");
        self.notifier.success("Produto excluído com sucesso!");
        Ok(())
    }

    // ---- Categories ----

    pub async fn list_categories(&self) -> Result<Vec<Category>, CommerceError> {
        self.stored(self.catalog.list_categories().await, "Erro ao carregar categorias")
    }

    /// Categories with the number of products using each one.
    pub async fn category_usage(&self) -> Result<Vec<CategoryUsage>, CommerceError> {
        let categories = self.list_categories().await?;
        let products = self.stored(self.catalog.list_products().await, "Erro ao carregar produtos")?;
        Ok(categories
            .into_iter()
            .map(|category| {
                let count = products.iter().filter(|p| p.category == category.slug).count();
                CategoryUsage {
                    category,
                    products: count,
                }
            })
            .collect())
    }

    fn validate_category(&self, input: &CategoryInput) -> Result<String, CommerceError> {
        if input.name.trim().is_empty() {
            return self.reject(ValidationError::MissingField("Nome"));
        }
        let slug = input.resolved_slug();
        if slug.is_empty() {
            return self.reject(ValidationError::InvalidSlug);
        }
        Ok(slug)
    }

    pub async fn add_category(&self, input: CategoryInput) -> Result<Category, CommerceError> {
        let slug = self.validate_category(&input)?;
        let category = Category::new(input.name.trim(), slug);
        self.stored(
            self.catalog.create_category(&category).await,
            "Erro ao salvar categoria",
        )?;
        info!(slug = %category.slug, "Category created");
        self.notifier.success("Categoria adicionada com sucesso!");
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: &CategoryId,
        input: CategoryInput,
    ) -> Result<Category, CommerceError> {
        let slug = self.validate_category(&input)?;
        let category = Category {
            id: id.clone(),
            name: input.name.trim().to_string(),
            slug,
        };
        self.stored(
            self.catalog.update_category(&category).await,
            "Erro ao salvar categoria",
        )?;
        info!(slug = %category.slug, "Category updated");
        self.notifier.success("Categoria atualizada com sucesso!");
        Ok(category)
    }

    /// Delete a category no product uses.
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), CommerceError> {
        let usage = self.category_usage().await?;
        let Some(entry) = usage.iter().find(|u| &u.category.id == id) else {
            self.notifier.error("Categoria não encontrada");
            return Err(CommerceError::CategoryNotFound(id.to_string()));
        };
        if entry.products > 0 {
            let err = CommerceError::CategoryInUse {
                slug: entry.category.slug.clone(),
                products: entry.products,
            };
            warn!(slug = %entry.category.slug, products = entry.products, "Category still in use");
            self.notifier.error(&err.to_string());
            return Err(err);
        }

        self.stored(self.catalog.delete_category(id).await, "Erro ao excluir categoria")?;
        info!(category_id = %id, "Category deleted");
        self.notifier.success("Categoria excluída com sucesso!");
        Ok(())
    }

    // ---- Orders ----

    pub async fn list_orders(&self) -> Result<Vec<Order>, CommerceError> {
        self.stored(self.orders.list_orders().await, "Erro ao carregar pedidos")
    }

    /// Move an order to `status` if the transition is allowed.
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<OrderStatus, CommerceError> {
        let orders = self.list_orders().await?;
        let Some(order) = orders.iter().find(|o| &o.id == id) else {
            self.notifier.error("Pedido não encontrado");
            return Err(CommerceError::OrderNotFound(id.to_string()));
        };

        if let Err(e) = order.status.transition(status) {
            warn!(order_id = %id, from = order.status.as_str(), to = status.as_str(), "Status change refused");
            self.notifier.error("Erro ao atualizar status do pedido");
            return Err(e);
        }
        if order.status == status {
            return Ok(status);
        }

        self.stored(
            self.orders.update_order_status(id, status).await,
            "Erro ao atualizar status do pedido",
        )?;
        info!(order_id = %id, status = status.as_str(), "Order status updated");
        self.notifier.success("Status do pedido atualizado!");
        Ok(status)
    }

    pub async fn delete_order(&self, id: &OrderId) -> Result<(), CommerceError> {
        self.stored(self.orders.delete_order(id).await, "Erro ao excluir pedido")?;
        info!(order_id = %id, "Order deleted");
        self.notifier.success("Pedido excluído com sucesso!");
        Ok(())
    }

    // ---- Settings ----

    pub fn settings(&self) -> StoreSettings {
        self.settings.snapshot()
    }

    /// Store the digits of `input`, truncated to 13.
    pub async fn update_whatsapp_number(&self, input: &str) -> Result<String, CommerceError> {
        let digits = limit_whatsapp_digits(input);
        if digits.is_empty() {
            return self.reject(ValidationError::InvalidWhatsAppNumber);
        }
        self.stored(
            self.settings
                .update(SettingsPatch::whatsapp_number(digits.clone()))
                .await,
            "Erro ao atualizar número do WhatsApp",
        )?;
        info!("WhatsApp number updated");
        self.notifier.success("Número do WhatsApp atualizado com sucesso!");
        Ok(digits)
    }

    pub async fn update_message_template(&self, template: &str) -> Result<(), CommerceError> {
        if template.trim().is_empty() {
            return self.reject(ValidationError::MissingField("Modelo de mensagem"));
        }
        self.stored(
            self.settings
                .update(SettingsPatch::message_template(template))
                .await,
            "Erro ao atualizar modelo de mensagem",
        )?;
        info!(len = template.len(), "Message template updated");
        self.notifier.success("Modelo de mensagem atualizado com sucesso!");
        Ok(())
    }

    pub async fn reset_message_template(&self) -> Result<(), CommerceError> {
        self.update_message_template(DEFAULT_TEMPLATE).await
    }

    /// Change the admin login. An empty password keeps the current one.
    pub async fn update_credentials(&self, username: &str, password: &str) -> Result<(), CommerceError> {
        let username = username.trim();
        if username.chars().count() < MIN_USERNAME_LEN {
            return self.reject(ValidationError::UsernameTooShort(MIN_USERNAME_LEN));
        }
        if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LEN {
            return self.reject(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
        }

        let patch = SettingsPatch {
            admin_username: Some(username.to_string()),
            admin_password: (!password.is_empty()).then(|| password.to_string()),
            ..Default::default()
        };
        self.stored(
            self.settings.update(patch).await,
            "Erro ao atualizar credenciais",
        )?;
        info!(username, "Admin credentials updated");
        self.notifier.success("Credenciais atualizadas com sucesso!");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartStore;
    use crate::checkout::OrderDraft;
    use crate::money::{Currency, Money};
    use crate::notify::{NoticeLevel, RecordingNotifier};
    use crate::store::{MemoryStore, SettingsStore};
    use async_trait::async_trait;

    struct Fixture {
        panel: AdminPanel,
        store: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::seeded(Currency::BRL));
        let settings = SettingsService::load(store.clone()).await;
        let notifier = Arc::new(RecordingNotifier::new());
        let panel = AdminPanel::new(store.clone(), store.clone(), settings, notifier.clone());
        Fixture {
            panel,
            store,
            notifier,
        }
    }

    fn new_product(name: &str, cents: i64) -> NewProduct {
        NewProduct {
            name: name.into(),
            description: "Caixa com 10".into(),
            price: Money::new(cents, Currency::BRL),
            category: "insumos".into(),
            image: None,
            badge: None,
        }
    }

    /// Catalog that refuses every write.
    struct ReadOnlyCatalog(MemoryStore);

    #[async_trait]
    impl CatalogStore for ReadOnlyCatalog {
        async fn list_products(&self) -> Result<Vec<Product>, PersistenceError> {
            self.0.list_products().await
        }
        async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, PersistenceError> {
            self.0.get_product(id).await
        }
        async fn create_product(&self, _p: &Product) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable("read only".into()))
        }
        async fn update_product(&self, _p: &Product) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable("read only".into()))
        }
        async fn delete_product(&self, _id: &ProductId) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable("read only".into()))
        }
        async fn list_categories(&self) -> Result<Vec<Category>, PersistenceError> {
            self.0.list_categories().await
        }
        async fn create_category(&self, _c: &Category) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable("read only".into()))
        }
        async fn update_category(&self, _c: &Category) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable("read only".into()))
        }
        async fn delete_category(&self, _id: &CategoryId) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable("read only".into()))
        }
    }

    #[tokio::test]
    async fn test_add_product_validates_and_notifies() {
        let f = fixture().await;

        let err = f.panel.add_product(new_product("  ", 100)).await.unwrap_err();
        assert_eq!(err, CommerceError::Validation(ValidationError::MissingField("Nome")));

        let err = f.panel.add_product(new_product("Seringa", -1)).await.unwrap_err();
        assert_eq!(err, CommerceError::Validation(ValidationError::NegativePrice));

        let product = f.panel.add_product(new_product("Seringa 3ml", 0)).await.unwrap();
        assert_eq!(product.image, "/placeholder.svg");
        assert_eq!(f.notifier.last().unwrap().message, "Produto adicionado com sucesso!");

        let listed = f.panel.list_products(&CatalogFilter::new()).await.unwrap();
        assert_eq!(listed[0].id, product.id);
    }

    #[tokio::test]
    async fn test_list_products_filters() {
        let f = fixture().await;
        let filter = CatalogFilter::new().text("toxina").category("toxinas");
        let products = f.panel.list_products(&filter).await.unwrap();
        assert_eq!(products.len(), 3);
    }

    #[tokio::test]
    async fn test_update_product() {
        let f = fixture().await;
        let update = ProductUpdate {
            price: Some(Money::new(99000, Currency::BRL)),
            ..Default::default()
        };
        let product = f.panel.update_product(&ProductId::new("ah-1"), update).await.unwrap();
        assert_eq!(product.price.display(), "R$ 990,00");

        let missing = f
            .panel
            .update_product(&ProductId::new("nope"), ProductUpdate::default())
            .await;
        assert!(matches!(missing, Err(CommerceError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_persistence_failure_is_reported() {
        let store = Arc::new(MemoryStore::seeded(Currency::BRL));
        let settings = SettingsService::load(store.clone()).await;
        let notifier = Arc::new(RecordingNotifier::new());
        let panel = AdminPanel::new(
            Arc::new(ReadOnlyCatalog(MemoryStore::seeded(Currency::BRL))),
            store,
            settings,
            notifier.clone(),
        );

        let err = panel.add_product(new_product("Seringa", 100)).await.unwrap_err();
        assert!(err.is_persistence());
        let notice = notifier.last().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Erro ao salvar produto");
    }

    #[tokio::test]
    async fn test_category_slug_is_derived() {
        let f = fixture().await;
        let category = f
            .panel
            .add_category(CategoryInput::new("Skinboosters Premium"))
            .await
            .unwrap();
        assert_eq!(category.slug, "skinboosters-premium");

        let err = f.panel.add_category(CategoryInput::new("!!!")).await.unwrap_err();
        assert_eq!(err, CommerceError::Validation(ValidationError::InvalidSlug));
    }

    #[tokio::test]
    async fn test_category_in_use_cannot_be_deleted() {
        let f = fixture().await;
        let err = f.panel.delete_category(&CategoryId::new("cat-2")).await.unwrap_err();
        assert!(matches!(err, CommerceError::CategoryInUse { products: 3, .. }));
        assert_eq!(f.store.list_categories().await.unwrap().len(), 5);

        let empty = f.panel.add_category(CategoryInput::new("Laser")).await.unwrap();
        f.panel.delete_category(&empty.id).await.unwrap();
        assert_eq!(f.store.list_categories().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_category_usage_counts() {
        let f = fixture().await;
        let usage = f.panel.category_usage().await.unwrap();
        let insumos = usage.iter().find(|u| u.category.slug == "insumos").unwrap();
        assert_eq!(insumos.products, 5);
    }

    #[tokio::test]
    async fn test_order_status_machine() {
        let f = fixture().await;
        let mut cart = CartStore::new(Currency::BRL);
        cart.add_item(Product::new("a", "A", Money::new(1000, Currency::BRL), "insumos"));
        let receipt = f
            .store
            .create_order(&OrderDraft::from_cart(&cart, "Maria", None))
            .await
            .unwrap();

        f.panel
            .update_order_status(&receipt.id, OrderStatus::Completed)
            .await
            .unwrap();
        let err = f
            .panel
            .update_order_status(&receipt.id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidStatusTransition { .. }));

        f.panel
            .update_order_status(&receipt.id, OrderStatus::Pending)
            .await
            .unwrap();
        f.panel
            .update_order_status(&receipt.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(f.panel.list_orders().await.unwrap()[0].status, OrderStatus::Cancelled);

        f.panel.delete_order(&receipt.id).await.unwrap();
        assert!(f.panel.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whatsapp_number_is_sanitized() {
        let f = fixture().await;
        let digits = f
            .panel
            .update_whatsapp_number("+55 (21) 98888-77770000")
            .await
            .unwrap();
        assert_eq!(digits, "5521988887777");
        assert_eq!(f.store.load_settings().await.unwrap().whatsapp_number, "5521988887777");

        let err = f.panel.update_whatsapp_number("abc").await.unwrap_err();
        assert_eq!(err, CommerceError::Validation(ValidationError::InvalidWhatsAppNumber));
    }

    #[tokio::test]
    async fn test_template_update_and_reset() {
        let f = fixture().await;
        f.panel.update_message_template("Pedido de {{cliente}}").await.unwrap();
        assert_eq!(f.panel.settings().message_template, "Pedido de {{cliente}}");

        f.panel.reset_message_template().await.unwrap();
        assert_eq!(f.panel.settings().message_template, DEFAULT_TEMPLATE);
    }

    #[tokio::test]
    async fn test_credentials_rules() {
        let f = fixture().await;

        let err = f.panel.update_credentials(" ab ", "secret99").await.unwrap_err();
        assert_eq!(err, CommerceError::Validation(ValidationError::UsernameTooShort(3)));

        let err = f.panel.update_credentials("operador", "12345").await.unwrap_err();
        assert_eq!(err, CommerceError::Validation(ValidationError::PasswordTooShort(6)));

        f.panel.update_credentials("operador", "").await.unwrap();
        let settings = f.panel.settings();
        assert_eq!(settings.admin_username, "operador");
        assert_eq!(settings.admin_password, "admin123");

        f.panel.update_credentials("operador", "nova-senha").await.unwrap();
        assert_eq!(f.panel.settings().admin_password, "nova-senha");
    }
}
