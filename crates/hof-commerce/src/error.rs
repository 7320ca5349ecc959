//! Commerce error types.

use thiserror::Error;

/// A user input problem that blocks an action before any side effect runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Customer name is empty after trimming.
    #[error("Por favor, informe seu nome")]
    EmptyName,

    /// Checkout attempted with no lines in the cart.
    #[error("Seu carrinho está vazio")]
    EmptyCart,

    /// A required admin form field is blank.
    #[error("Campo obrigatório: {0}")]
    MissingField(&'static str),

    /// Price below zero.
    #[error("O preço não pode ser negativo")]
    NegativePrice,

    /// Category slug is empty after normalization.
    #[error("Slug inválido")]
    InvalidSlug,

    /// WhatsApp number has no digits.
    #[error("Número do WhatsApp inválido")]
    InvalidWhatsAppNumber,

    /// Admin username shorter than the minimum.
    #[error("O usuário deve ter pelo menos {0} caracteres")]
    UsernameTooShort(usize),

    /// Admin password shorter than the minimum.
    #[error("A senha deve ter pelo menos {0} caracteres")]
    PasswordTooShort(usize),
}

impl ValidationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyName => "empty_name",
            ValidationError::EmptyCart => "empty_cart",
            ValidationError::MissingField(_) => "missing_field",
            ValidationError::NegativePrice => "negative_price",
            ValidationError::InvalidSlug => "invalid_slug",
            ValidationError::InvalidWhatsAppNumber => "invalid_whatsapp_number",
            ValidationError::UsernameTooShort(_) => "username_too_short",
            ValidationError::PasswordTooShort(_) => "password_too_short",
        }
    }
}

/// Failures reported by a storage collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The store could not be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The targeted record does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A uniqueness or reference constraint was violated.
    #[error("Conflicting record: {0}")]
    Conflict(String),

    /// The statement failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),
}

/// Errors that can occur in commerce operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The storage collaborator failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Category is still referenced by products.
    #[error("Esta categoria está em uso por {products} produto(s). Remova os produtos primeiro.")]
    CategoryInUse { slug: String, products: usize },

    /// Order status change not allowed by the state machine.
    #[error("Invalid order status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Unknown order status string.
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}

impl CommerceError {
    /// Check if this is a validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, CommerceError::Validation(_))
    }

    /// Check if this is a storage failure.
    pub fn is_persistence(&self) -> bool {
        matches!(self, CommerceError::Persistence(_))
    }
}
