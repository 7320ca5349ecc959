//! Cart store and line types.

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A product and the quantity the customer intends to buy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Product snapshot taken when the line was created.
    pub product: Product,
    /// Quantity, always at least 1 while the line exists.
    pub quantity: i64,
}

impl CartLine {
    fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.product.price.saturating_multiply(self.quantity)
    }
}

/// The session's cart.
///
/// Holds at most one line per product id, in insertion order. Totals are
/// derived from the lines on every read and cannot be set directly. All
/// mutations take `&mut self`, so a reader never sees a half-applied change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CartStore {
    lines: Vec<CartLine>,
    currency: Currency,
}

impl CartStore {
    /// Create an empty cart priced in `currency`.
    pub fn new(currency: Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line for the product, otherwise appends a new
    /// line with quantity 1 after all existing lines.
    pub fn add_item(&mut self, product: Product) {
        match self.lines.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(product)),
        }
    }

    /// Remove the line for a product. Absent ids are ignored.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.lines.retain(|l| &l.product.id != product_id);
    }

    /// Set a line's quantity; zero or less removes the line.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| &l.product.id == product_id) {
            line.quantity = quantity;
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product.id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Sum of quantities.
    pub fn total_items(&self) -> i64 {
        self.lines
            .iter()
            .fold(0_i64, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Sum of price times quantity, clamped at the representable range.
    pub fn total_price(&self) -> Money {
        let line_totals: Vec<Money> = self.lines.iter().map(CartLine::line_total).collect();
        Money::try_sum(line_totals.iter(), self.currency).unwrap_or_else(|| {
            let cents = line_totals
                .iter()
                .fold(0_i64, |acc, m| acc.saturating_add(m.amount_cents));
            Money::new(cents, self.currency)
        })
    }
}
