//! Product catalog module.
//!
//! Contains types for products, categories, the listing filter and the
//! starter catalog.

mod category;
mod filter;
mod product;
mod seed;

pub use category::{category_label, default_categories, slugify, Category, CategoryInput};
pub use filter::CatalogFilter;
pub use product::{Badge, NewProduct, Product, ProductUpdate, DEFAULT_IMAGE};
pub use seed::starter_products;
