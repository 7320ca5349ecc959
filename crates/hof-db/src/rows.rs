//! Row shapes returned by the SQL in `sql/` and their conversion into
//! domain types.
//!
//! Prices are selected as integer cents (`(price * 100)::BIGINT`) so no
//! floating point is involved between the `DECIMAL` column and [`Money`].

use crate::DbError;
use chrono::{DateTime, Utc};
use hof_commerce::catalog::{Badge, Category, Product};
use hof_commerce::checkout::{Order, OrderLine, OrderStatus};
use hof_commerce::{Currency, Money};
use sqlx::{postgres::PgRow, FromRow, Row};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone)]
pub(crate) struct ProductRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub category: String,
    pub image: String,
    pub badge: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price_cents: row.try_get("price_cents")?,
            category: row.try_get("category")?,
            image: row.try_get("image")?,
            badge: row.try_get("badge")?,
        })
    }
}

impl ProductRow {
    /// Unknown badge values are dropped rather than failing the listing.
    pub fn into_product(self, currency: Currency) -> Product {
        let badge = self.badge.as_deref().and_then(|raw| {
            let parsed = Badge::from_str(raw);
            if parsed.is_none() && !raw.is_empty() {
                warn!(product = %self.id, badge = raw, "Ignoring unknown badge");
            }
            parsed
        });

        Product {
            id: self.id.into(),
            name: self.name,
            description: self.description,
            price: Money::new(self.price_cents, currency),
            category: self.category,
            image: self.image,
            badge,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CategoryRow {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl<'r> FromRow<'r, PgRow> for CategoryRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
        })
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id.into(),
            name: row.name,
            slug: row.slug,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OrderRow {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub total_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for OrderRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            customer_name: row.try_get("customer_name")?,
            customer_phone: row.try_get("customer_phone")?,
            total_cents: row.try_get("total_cents")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OrderItemRow {
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub price_cents: i64,
    pub quantity: i32,
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            order_id: row.try_get("order_id")?,
            product_id: row.try_get("product_id")?,
            product_name: row.try_get("product_name")?,
            price_cents: row.try_get("price_cents")?,
            quantity: row.try_get("quantity")?,
        })
    }
}

impl OrderItemRow {
    fn into_line(self, currency: Currency) -> OrderLine {
        OrderLine {
            product_id: self.product_id.into(),
            product_name: self.product_name,
            unit_price: Money::new(self.price_cents, currency),
            quantity: i64::from(self.quantity),
        }
    }
}

/// Attach item rows to their orders, keeping the order rows' sequence.
///
/// Items whose order is not in `orders` are skipped.
pub(crate) fn assemble_orders(
    orders: Vec<OrderRow>,
    items: Vec<OrderItemRow>,
    currency: Currency,
) -> Result<Vec<Order>, DbError> {
    let mut lines: HashMap<String, Vec<OrderLine>> = HashMap::new();
    for item in items {
        let order_id = item.order_id.clone();
        lines
            .entry(order_id)
            .or_default()
            .push(item.into_line(currency));
    }

    orders
        .into_iter()
        .map(|row| {
            let status = OrderStatus::from_str(&row.status).ok_or_else(|| {
                DbError::Decode(format!("order {} has unknown status '{}'", row.id, row.status))
            })?;
            let items = lines.remove(&row.id).unwrap_or_default();
            Ok(Order {
                id: row.id.into(),
                customer_name: row.customer_name,
                customer_phone: row.customer_phone,
                items,
                total: Money::new(row.total_cents, currency),
                status,
                created_at: row.created_at,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_row(id: &str, status: &str) -> OrderRow {
        OrderRow {
            id: id.to_string(),
            customer_name: "Maria".to_string(),
            customer_phone: "Não informado".to_string(),
            total_cents: 130000,
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    fn item_row(order_id: &str, product_id: &str, quantity: i32) -> OrderItemRow {
        OrderItemRow {
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
            product_name: "Toxina Botulínica Botox".to_string(),
            price_cents: 65000,
            quantity,
        }
    }

    #[test]
    fn test_product_row_into_product() {
        let row = ProductRow {
            id: "tx-1".to_string(),
            name: "Toxina Botulínica Botox".to_string(),
            description: "100U".to_string(),
            price_cents: 65000,
            category: "toxinas".to_string(),
            image: "/placeholder.svg".to_string(),
            badge: Some("bestseller".to_string()),
        };

        let product = row.into_product(Currency::BRL);
        assert_eq!(product.id.as_str(), "tx-1");
        assert_eq!(product.price.display(), "R$ 650,00");
        assert_eq!(product.badge, Some(Badge::Bestseller));
    }

    #[test]
    fn test_unknown_badge_is_dropped() {
        let row = ProductRow {
            id: "ac-1".to_string(),
            name: "Cânula".to_string(),
            description: String::new(),
            price_cents: 1500,
            category: "acessorios".to_string(),
            image: "/placeholder.svg".to_string(),
            badge: Some("limited".to_string()),
        };

        assert_eq!(row.into_product(Currency::BRL).badge, None);
    }

    #[test]
    fn test_assemble_orders_groups_items() {
        let orders = vec![order_row("order-2", "pending"), order_row("order-1", "completed")];
        let items = vec![
            item_row("order-1", "tx-1", 2),
            item_row("order-2", "ah-1", 1),
            item_row("order-1", "fio-1", 3),
            item_row("order-gone", "ac-1", 1),
        ];

        let assembled = assemble_orders(orders, items, Currency::BRL).unwrap();
        assert_eq!(assembled.len(), 2);
        assert_eq!(assembled[0].id.as_str(), "order-2");
        assert_eq!(assembled[0].items.len(), 1);
        assert_eq!(assembled[1].status, OrderStatus::Completed);
        assert_eq!(assembled[1].item_count(), 5);
        assert_eq!(assembled[1].items[1].product_id.as_str(), "fio-1");
    }

    #[test]
    fn test_order_without_items_gets_empty_lines() {
        let assembled =
            assemble_orders(vec![order_row("order-1", "cancelled")], vec![], Currency::BRL)
                .unwrap();
        assert!(assembled[0].items.is_empty());
    }

    #[test]
    fn test_unknown_status_is_decode_error() {
        let result = assemble_orders(vec![order_row("order-1", "shipped")], vec![], Currency::BRL);
        assert!(matches!(result, Err(DbError::Decode(_))));
    }
}
