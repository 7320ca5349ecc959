//! Shopping cart module.
//!
//! The cart is session state only; it is never persisted.

mod cart;

pub use cart::{CartLine, CartStore};
