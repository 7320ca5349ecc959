//! Checkout module.
//!
//! Contains orders, the message template, phone handling, deep links and
//! the submit sequence.

mod composer;
mod link;
mod order;
mod phone;
mod supervisor;
mod template;

pub use composer::{
    validate_checkout, CheckoutOptions, CheckoutReceipt, CustomerForm, LaunchError, Launcher,
    LinkOpening, OrderComposer, SessionReloader, StorefrontSession, DEFAULT_RELOAD_DELAY,
    REDIRECT_NOTICE,
};
pub use link::{encode_component, DeepLink, DEFAULT_MESSAGING_HOST};
pub use order::{Order, OrderDraft, OrderLine, OrderReceipt, OrderStatus, PHONE_NOT_PROVIDED};
pub use phone::{
    digits_only, format_customer_phone, format_whatsapp_display, limit_whatsapp_digits,
    MAX_WHATSAPP_DIGITS,
};
pub use supervisor::{TaskOutcome, TaskReport, TaskSupervisor};
pub use template::{
    compose_for_draft, compose_message, effective_template, items_block, render, ComposedMessage,
    TemplateValues, Token, DEFAULT_TEMPLATE,
};
