//! PostgreSQL implementation of the storage traits.

use crate::rows::{assemble_orders, CategoryRow, OrderItemRow, OrderRow, ProductRow};
use crate::{Db, DbError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hof_commerce::catalog::{Category, Product};
use hof_commerce::checkout::{Order, OrderDraft, OrderReceipt, OrderStatus};
use hof_commerce::settings::{SettingsPatch, StoreSettings};
use hof_commerce::store::{CatalogStore, OrderStore, SettingsStore};
use hof_commerce::{CategoryId, Currency, OrderId, PersistenceError, ProductId};
use sqlx::postgres::PgQueryResult;
use sqlx::{query, query_as, query_scalar, Postgres};
use tracing::{debug, info, instrument};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

const LIST_CATEGORIES_SQL: &str = include_str!("sql/list_categories.sql");
const CREATE_CATEGORY_SQL: &str = include_str!("sql/create_category.sql");
const UPDATE_CATEGORY_SQL: &str = include_str!("sql/update_category.sql");
const DELETE_CATEGORY_SQL: &str = include_str!("sql/delete_category.sql");

const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");
const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");
const DELETE_ORDER_SQL: &str = include_str!("sql/delete_order.sql");

const LIST_SETTINGS_SQL: &str = include_str!("sql/list_settings.sql");
const UPSERT_SETTING_SQL: &str = include_str!("sql/upsert_setting.sql");

/// Catalog, order and settings storage backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
    db: Db,
    currency: Currency,
}

impl PgStore {
    pub fn new(db: Db, currency: Currency) -> Self {
        Self { db, currency }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }
}

fn ensure_affected(result: PgQueryResult, what: String) -> Result<(), PersistenceError> {
    if result.rows_affected() == 0 {
        return Err(PersistenceError::NotFound(what));
    }
    Ok(())
}

fn db_err(error: sqlx::Error) -> PersistenceError {
    DbError::from(error).into()
}

#[async_trait]
impl CatalogStore for PgStore {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, PersistenceError> {
        let rows = query_as::<Postgres, ProductRow>(LIST_PRODUCTS_SQL)
            .fetch_all(self.db.pool())
            .await
            .map_err(db_err)?;
        debug!(count = rows.len(), "Products loaded");
        Ok(rows
            .into_iter()
            .map(|row| row.into_product(self.currency))
            .collect())
    }

    #[instrument(skip_all, fields(product = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, PersistenceError> {
        let row = query_as::<Postgres, ProductRow>(GET_PRODUCT_SQL)
            .bind(id.as_str())
            .fetch_optional(self.db.pool())
            .await
            .map_err(db_err)?;
        Ok(row.map(|row| row.into_product(self.currency)))
    }

    #[instrument(skip_all, fields(product = %product.id))]
    async fn create_product(&self, product: &Product) -> Result<(), PersistenceError> {
        query(CREATE_PRODUCT_SQL)
            .bind(product.id.as_str())
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price.amount_cents)
            .bind(&product.category)
            .bind(&product.image)
            .bind(product.badge.map(|b| b.as_str()))
            .execute(self.db.pool())
            .await
            .map_err(db_err)?;
        info!("Product created");
        Ok(())
    }

    #[instrument(skip_all, fields(product = %product.id))]
    async fn update_product(&self, product: &Product) -> Result<(), PersistenceError> {
        let result = query(UPDATE_PRODUCT_SQL)
            .bind(product.id.as_str())
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price.amount_cents)
            .bind(&product.category)
            .bind(&product.image)
            .bind(product.badge.map(|b| b.as_str()))
            .execute(self.db.pool())
            .await
            .map_err(db_err)?;
        ensure_affected(result, format!("product {}", product.id))
    }

    #[instrument(skip_all, fields(product = %id))]
    async fn delete_product(&self, id: &ProductId) -> Result<(), PersistenceError> {
        let result = query(DELETE_PRODUCT_SQL)
            .bind(id.as_str())
            .execute(self.db.pool())
            .await
            .map_err(db_err)?;
        ensure_affected(result, format!("product {id}"))
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, PersistenceError> {
        let rows = query_as::<Postgres, CategoryRow>(LIST_CATEGORIES_SQL)
            .fetch_all(self.db.pool())
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    #[instrument(skip_all, fields(slug = %category.slug))]
    async fn create_category(&self, category: &Category) -> Result<(), PersistenceError> {
        query(CREATE_CATEGORY_SQL)
            .bind(category.id.as_str())
            .bind(&category.name)
            .bind(&category.slug)
            .execute(self.db.pool())
            .await
            .map_err(db_err)?;
        info!("Category created");
        Ok(())
    }

    #[instrument(skip_all, fields(category = %category.id))]
    async fn update_category(&self, category: &Category) -> Result<(), PersistenceError> {
        let result = query(UPDATE_CATEGORY_SQL)
            .bind(category.id.as_str())
            .bind(&category.name)
            .bind(&category.slug)
            .execute(self.db.pool())
            .await
            .map_err(db_err)?;
        ensure_affected(result, format!("category {}", category.id))
    }

    #[instrument(skip_all, fields(category = %id))]
    async fn delete_category(&self, id: &CategoryId) -> Result<(), PersistenceError> {
        let result = query(DELETE_CATEGORY_SQL)
            .bind(id.as_str())
            .execute(self.db.pool())
            .await
            .map_err(db_err)?;
        ensure_affected(result, format!("category {id}"))
    }
}

#[async_trait]
impl OrderStore for PgStore {
    #[instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<Order>, PersistenceError> {
        let orders = query_as::<Postgres, OrderRow>(LIST_ORDERS_SQL)
            .fetch_all(self.db.pool())
            .await
            .map_err(db_err)?;
        let items = query_as::<Postgres, OrderItemRow>(LIST_ORDER_ITEMS_SQL)
            .fetch_all(self.db.pool())
            .await
            .map_err(db_err)?;
        Ok(assemble_orders(orders, items, self.currency)?)
    }

    #[instrument(skip_all, fields(items = draft.items.len()))]
    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderReceipt, PersistenceError> {
        let id = OrderId::generate();
        let mut tx = self.db.pool().begin().await.map_err(db_err)?;

        let created_at = query_scalar::<Postgres, DateTime<Utc>>(CREATE_ORDER_SQL)
            .bind(id.as_str())
            .bind(&draft.customer_name)
            .bind(draft.phone_or_placeholder())
            .bind(draft.total.amount_cents)
            .bind(draft.status.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;

        for line in &draft.items {
            let quantity = i32::try_from(line.quantity).map_err(|_| {
                PersistenceError::Query(format!("quantity {} out of range", line.quantity))
            })?;
            query(CREATE_ORDER_ITEM_SQL)
                .bind(id.as_str())
                .bind(line.product_id.as_str())
                .bind(&line.product_name)
                .bind(line.unit_price.amount_cents)
                .bind(quantity)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        info!(order = %id, "Order stored");
        Ok(OrderReceipt { id, created_at })
    }

    #[instrument(skip_all, fields(order = %id, status = status.as_str()))]
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), PersistenceError> {
        let result = query(UPDATE_ORDER_STATUS_SQL)
            .bind(id.as_str())
            .bind(status.as_str())
            .execute(self.db.pool())
            .await
            .map_err(db_err)?;
        ensure_affected(result, format!("order {id}"))
    }

    #[instrument(skip_all, fields(order = %id))]
    async fn delete_order(&self, id: &OrderId) -> Result<(), PersistenceError> {
        // order_items go with it through ON DELETE CASCADE
        let result = query(DELETE_ORDER_SQL)
            .bind(id.as_str())
            .execute(self.db.pool())
            .await
            .map_err(db_err)?;
        ensure_affected(result, format!("order {id}"))
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    #[instrument(skip(self))]
    async fn load_settings(&self) -> Result<StoreSettings, PersistenceError> {
        let rows = query_as::<Postgres, (String, String)>(LIST_SETTINGS_SQL)
            .fetch_all(self.db.pool())
            .await
            .map_err(db_err)?;
        Ok(StoreSettings::from_pairs(rows))
    }

    #[instrument(skip_all)]
    async fn save_settings(&self, patch: &SettingsPatch) -> Result<(), PersistenceError> {
        let pairs = patch.to_pairs();
        if pairs.is_empty() {
            return Ok(());
        }

        let mut tx = self.db.pool().begin().await.map_err(db_err)?;
        for (key, value) in &pairs {
            query(UPSERT_SETTING_SQL)
                .bind(*key)
                .bind(value)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)?;
        info!(keys = pairs.len(), "Settings saved");
        Ok(())
    }
}
