//! Order types.

use crate::cart::CartStore;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder stored and sent when the customer leaves the phone blank.
pub const PHONE_NOT_PROVIDED: &str = "Não informado";

/// Order status.
///
/// Allowed changes: pending to completed or cancelled, and either of those
/// back to pending. Setting the current status again is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting the operator.
    #[default]
    Pending,
    /// Operator fulfilled the order.
    Completed,
    /// Order was cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendente",
            OrderStatus::Completed => "Concluído",
            OrderStatus::Cancelled => "Cancelado",
        }
    }

    /// Check whether moving to `next` is allowed.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (*self, next),
            (Pending, Completed)
                | (Pending, Cancelled)
                | (Completed, Pending)
                | (Cancelled, Pending)
        ) || *self == next
    }

    /// Validate a transition, returning the resulting status.
    pub fn transition(&self, next: OrderStatus) -> Result<OrderStatus, CommerceError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CommerceError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

/// A line copied from the cart at submission time.
///
/// Name and price are frozen here so later catalog edits never alter a
/// placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl OrderLine {
    pub fn line_total(&self) -> Money {
        self.unit_price.saturating_multiply(self.quantity)
    }
}

/// Order payload built at checkout, before it has been stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDraft {
    /// Trimmed customer name.
    pub customer_name: String,
    /// Phone as entered, `None` when left blank.
    pub customer_phone: Option<String>,
    pub items: Vec<OrderLine>,
    pub total: Money,
    pub status: OrderStatus,
}

impl OrderDraft {
    /// Snapshot a cart and the customer fields.
    pub fn from_cart(cart: &CartStore, customer_name: &str, customer_phone: Option<&str>) -> Self {
        let items = cart
            .items()
            .iter()
            .map(|line| OrderLine {
                product_id: line.product.id.clone(),
                product_name: line.product.name.clone(),
                unit_price: line.product.price,
                quantity: line.quantity,
            })
            .collect();

        Self {
            customer_name: customer_name.trim().to_string(),
            customer_phone: customer_phone
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            items,
            total: cart.total_price(),
            status: OrderStatus::Pending,
        }
    }

    /// Phone value written to storage and to the message.
    pub fn phone_or_placeholder(&self) -> &str {
        self.customer_phone.as_deref().unwrap_or(PHONE_NOT_PROVIDED)
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// What the order store hands back after a successful insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderReceipt {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
}

/// A stored order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    pub customer_name: String,
    /// Phone as stored; `Não informado` when the customer left it blank.
    pub customer_phone: String,
    pub items: Vec<OrderLine>,
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Combine a draft with the identity assigned by the store.
    pub fn from_draft(draft: OrderDraft, receipt: OrderReceipt) -> Self {
        let customer_phone = draft.phone_or_placeholder().to_string();
        Self {
            id: receipt.id,
            customer_name: draft.customer_name,
            customer_phone,
            items: draft.items,
            total: draft.total,
            status: draft.status,
            created_at: receipt.created_at,
        }
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
