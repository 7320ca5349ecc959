//! Catalog listing filter.

use super::Product;
use serde::{Deserialize, Serialize};

/// Filter applied to the product list.
///
/// Both criteria must hold when both are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Case-insensitive substring over name or description.
    pub text: Option<String>,
    /// Category slug.
    pub category: Option<String>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.text = if query.trim().is_empty() {
            None
        } else {
            Some(query.trim().to_string())
        };
        self
    }

    pub fn category(mut self, slug: impl Into<String>) -> Self {
        self.category = Some(slug.into());
        self
    }

    /// Check whether a product passes the filter.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(slug) = &self.category {
            if &product.category != slug {
                return false;
            }
        }
        match &self.text {
            Some(query) => product.matches_text(query),
            None => true,
        }
    }

    /// Keep the matching products, preserving order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("ah-1", "Ácido Hialurônico Juvederm", Money::new(89000, Currency::BRL), "preenchedores"),
            Product::new("tx-1", "Toxina Botox", Money::new(65000, Currency::BRL), "toxinas")
                .with_description("Padrão ouro"),
            Product::new("tx-2", "Toxina Dysport", Money::new(58000, Currency::BRL), "toxinas"),
        ]
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let products = catalog();
        assert_eq!(CatalogFilter::new().apply(&products).len(), 3);
    }

    #[test]
    fn test_text_and_category_combine() {
        let products = catalog();
        let filter = CatalogFilter::new().text("toxina").category("toxinas");
        assert_eq!(filter.apply(&products).len(), 2);

        let filter = CatalogFilter::new().text("ouro").category("toxinas");
        let found = filter.apply(&products);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "tx-1");

        let filter = CatalogFilter::new().text("toxina").category("preenchedores");
        assert!(filter.apply(&products).is_empty());
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let filter = CatalogFilter::new().text("   ");
        assert!(filter.text.is_none());
    }
}
