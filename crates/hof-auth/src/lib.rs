//! Admin authentication.
//!
//! A single operator account whose username and password live in the store
//! settings. A successful login persists a flag in local storage under
//! [`AUTH_FLAG_KEY`]; there is no token and no expiry.

mod admin;
mod credentials;
mod error;
mod flag;

pub use admin::AdminAuth;
pub use credentials::{constant_time_compare, credentials_match};
pub use error::AuthError;
pub use flag::{AuthFlag, AUTH_FLAG_KEY};
