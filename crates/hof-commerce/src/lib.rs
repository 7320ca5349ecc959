//! Storefront domain for Help HOF.
//!
//! This crate provides the types and services behind the storefront and its
//! admin panel:
//!
//! - **Catalog**: products, badges, categories, listing filter
//! - **Cart**: the session cart with derived totals
//! - **Checkout**: order drafts, the WhatsApp message template, deep links
//!   and the optimistic submit sequence
//! - **Settings**: store settings with an explicit load/save lifecycle
//! - **Store**: async storage traits plus an in-memory implementation
//! - **Admin**: catalog, category, order and settings management
//!
//! # Example
//!
//! ```rust
//! use hof_commerce::prelude::*;
//!
//! let mut cart = CartStore::new(Currency::BRL);
//! let botox = Product::new("tx-1", "Toxina Botulínica Botox", Money::new(65000, Currency::BRL), "toxinas");
//! cart.add_item(botox.clone());
//! cart.add_item(botox);
//!
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price().display(), "R$ 1.300,00");
//!
//! let message = compose_message(&cart, "Maria", None, None);
//! assert!(message.text.contains("- 2x Toxina Botulínica Botox - R$ 1.300,00"));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod notify;
pub mod settings;
pub mod store;

pub use error::{CommerceError, PersistenceError, ValidationError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, PersistenceError, ValidationError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        Badge, CatalogFilter, Category, CategoryInput, NewProduct, Product, ProductUpdate,
    };

    // Cart
    pub use crate::cart::{CartLine, CartStore};

    // Checkout
    pub use crate::checkout::{
        compose_message, CheckoutOptions, CheckoutReceipt, ComposedMessage, CustomerForm,
        DeepLink, LaunchError, Launcher, LinkOpening, Order, OrderComposer, OrderDraft,
        OrderStatus, SessionReloader, StorefrontSession,
    };

    // Services and storage
    pub use crate::admin::AdminPanel;
    pub use crate::notify::{Notifier, TracingNotifier};
    pub use crate::settings::{SettingsPatch, SettingsService, StoreSettings};
    pub use crate::store::{CatalogStore, MemoryStore, OrderStore, SettingsStore};
}
