//! PostgreSQL storage for the Help HOF storefront.
//!
//! [`PgStore`] implements the catalog, order and settings storage traits
//! from `hof-commerce` on top of an sqlx connection pool. Queries live in
//! `src/sql/` and are embedded at compile time.
//!
//! # Example
//!
//! ```rust,ignore
//! use hof_db::{Db, PgStore};
//! use hof_commerce::prelude::*;
//!
//! let db = Db::connect("postgres://localhost/helphof", 5).await?;
//! db.init_schema().await?;
//! db.seed_defaults().await?;
//!
//! let store = PgStore::new(db, Currency::BRL);
//! let products = store.list_products().await?;
//! ```

mod db;
mod error;
mod rows;
mod store;

pub use db::{Db, DEFAULT_MAX_CONNECTIONS};
pub use error::DbError;
pub use store::PgStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Db, DbError, PgStore};
}
