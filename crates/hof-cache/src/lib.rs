//! Typed local key/value storage.
//!
//! Values are stored as JSON, either in a single file on disk or in a
//! process-local map. The file is created on the first write.
//!
//! # Example
//!
//! ```rust
//! use hof_cache::Cache;
//!
//! let cache = Cache::in_memory();
//! cache.set("helphof-auth", &true).unwrap();
//!
//! let flag: Option<bool> = cache.get("helphof-auth").unwrap();
//! assert_eq!(flag, Some(true));
//!
//! cache.delete("helphof-auth").unwrap();
//! assert!(!cache.exists("helphof-auth").unwrap());
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError};
}
