//! Order message template.
//!
//! A fixed set of four tokens, replaced in a single left-to-right pass.
//! Substituted values are never scanned again, so a customer name that
//! happens to contain `{{total}}` is sent literally.

use super::link::encode_component;
use super::order::OrderDraft;
use crate::cart::CartStore;
use serde::{Deserialize, Serialize};

/// Template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = "🛒 *Novo Pedido - Help HOF*

*Cliente:* {{cliente}}
*Telefone:* {{telefone}}

*Itens do Pedido:*
━━━━━━━━━━━━━━━
{{itens}}
━━━━━━━━━━━━━━━

💰 *Total: {{total}}*

Aguardo confirmação do pedido!";

/// Recognized placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Customer,
    Phone,
    Items,
    Total,
}

impl Token {
    pub fn all() -> [Token; 4] {
        [Token::Customer, Token::Phone, Token::Items, Token::Total]
    }

    /// Name between the braces.
    pub fn name(&self) -> &'static str {
        match self {
            Token::Customer => "cliente",
            Token::Phone => "telefone",
            Token::Items => "itens",
            Token::Total => "total",
        }
    }

    pub fn placeholder(&self) -> String {
        format!("{{{{{}}}}}", self.name())
    }

    fn from_name(name: &str) -> Option<Self> {
        Token::all().into_iter().find(|t| t.name() == name)
    }
}

/// Values substituted into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues {
    pub customer: String,
    pub phone: String,
    pub items: String,
    pub total: String,
}

impl TemplateValues {
    fn get(&self, token: Token) -> &str {
        match token {
            Token::Customer => &self.customer,
            Token::Phone => &self.phone,
            Token::Items => &self.items,
            Token::Total => &self.total,
        }
    }

    /// Values for a draft: trimmed name, phone or placeholder, items block, total.
    pub fn from_draft(draft: &OrderDraft) -> Self {
        Self {
            customer: draft.customer_name.trim().to_string(),
            phone: draft.phone_or_placeholder().to_string(),
            items: items_block(draft),
            total: draft.total.display(),
        }
    }
}

/// Replace every known token; unknown `{{...}}` sequences are copied through.
pub fn render(template: &str, values: &TemplateValues) -> String {
    let mut out = String::with_capacity(template.len() + 128);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let replaced = after.find("}}").and_then(|end| {
            Token::from_name(&after[..end]).map(|token| (token, end))
        });
        match replaced {
            Some((token, end)) => {
                out.push_str(values.get(token));
                rest = &after[end + 2..];
            }
            None => {
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// One row per line: `- {quantity}x {name} - {line total}`.
pub fn items_block(draft: &OrderDraft) -> String {
    draft
        .items
        .iter()
        .map(|item| {
            format!(
                "- {}x {} - {}",
                item.quantity,
                item.product_name,
                item.line_total().display()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The configured template, or the default when blank.
pub fn effective_template(template: Option<&str>) -> &str {
    match template {
        Some(t) if !t.trim().is_empty() => t,
        _ => DEFAULT_TEMPLATE,
    }
}

/// A rendered message in plain and query-encoded form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComposedMessage {
    pub text: String,
    pub encoded: String,
}

impl ComposedMessage {
    fn new(text: String) -> Self {
        let encoded = encode_component(&text);
        Self { text, encoded }
    }
}

/// Render the order message for a draft.
pub fn compose_for_draft(draft: &OrderDraft, template: Option<&str>) -> ComposedMessage {
    let values = TemplateValues::from_draft(draft);
    ComposedMessage::new(render(effective_template(template), &values))
}

/// Render the order message straight from a cart and the customer fields.
pub fn compose_message(
    cart: &CartStore,
    customer_name: &str,
    customer_phone: Option<&str>,
    template: Option<&str>,
) -> ComposedMessage {
    let draft = OrderDraft::from_cart(cart, customer_name, customer_phone);
    compose_for_draft(&draft, template)
}
