//! Connection pool and schema bootstrap.

use crate::DbError;
use hof_commerce::catalog::{default_categories, starter_products};
use hof_commerce::settings::StoreSettings;
use hof_commerce::Currency;
use sqlx::postgres::PgPoolOptions;
use sqlx::{query, raw_sql, PgPool};
use tracing::{info, instrument};

const SCHEMA_SQL: &str = include_str!("sql/schema.sql");
const SEED_SETTING_SQL: &str = include_str!("sql/seed_setting.sql");
const SEED_CATEGORY_SQL: &str = include_str!("sql/seed_category.sql");
const SEED_PRODUCT_SQL: &str = include_str!("sql/seed_product.sql");

/// Default pool size when none is configured.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Unavailable`] when the server cannot be reached.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(url)
            .await
            .map_err(|e| DbError::Unavailable(e.to_string()))?;
        info!(max_connections, "Connected to database");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the tables if they do not exist yet.
    #[instrument(skip(self))]
    pub async fn init_schema(&self) -> Result<(), DbError> {
        raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        info!("Schema ready");
        Ok(())
    }

    /// Insert default settings and categories. Existing rows are left alone.
    #[instrument(skip(self))]
    pub async fn seed_defaults(&self) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for (key, value) in StoreSettings::default().to_pairs() {
            query(SEED_SETTING_SQL)
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await?;
        }

        for category in default_categories() {
            query(SEED_CATEGORY_SQL)
                .bind(category.id.as_str())
                .bind(&category.name)
                .bind(&category.slug)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!("Default settings and categories seeded");
        Ok(())
    }

    /// Insert the starter catalog. Returns how many products were new.
    #[instrument(skip(self))]
    pub async fn seed_products(&self, currency: Currency) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for product in starter_products(currency) {
            let result = query(SEED_PRODUCT_SQL)
                .bind(product.id.as_str())
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.price.amount_cents)
                .bind(&product.category)
                .bind(&product.image)
                .bind(product.badge.map(|b| b.as_str()))
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        info!(inserted, "Starter catalog seeded");
        Ok(inserted)
    }
}
