//! The persisted "logged in" flag.

use crate::AuthError;
use hof_cache::Cache;
use std::sync::Arc;
use tracing::warn;

/// Local storage key holding the authenticated flag.
pub const AUTH_FLAG_KEY: &str = "helphof-auth";

/// Boolean stored under [`AUTH_FLAG_KEY`].
///
/// Reading and clearing need no credentials, so `logout` and status
/// checks work without a database.
#[derive(Clone)]
pub struct AuthFlag {
    cache: Arc<Cache>,
}

impl AuthFlag {
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }

    pub(crate) fn set(&self) -> Result<(), AuthError> {
        self.cache.set(AUTH_FLAG_KEY, &true)?;
        Ok(())
    }

    /// Remove the flag. Clearing twice is fine.
    pub fn clear(&self) -> Result<(), AuthError> {
        self.cache.delete(AUTH_FLAG_KEY)?;
        Ok(())
    }

    /// Whether the flag is set. Unreadable values count as unset.
    pub fn is_set(&self) -> bool {
        match self.cache.get::<bool>(AUTH_FLAG_KEY) {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                warn!(error = %e, "Unreadable auth flag");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let cache = Arc::new(Cache::in_memory());
        let flag = AuthFlag::new(cache.clone());
        assert!(!flag.is_set());

        flag.set().unwrap();
        assert!(flag.is_set());
        assert_eq!(cache.get::<bool>(AUTH_FLAG_KEY).unwrap(), Some(true));

        flag.clear().unwrap();
        flag.clear().unwrap();
        assert!(!flag.is_set());
    }

    #[test]
    fn test_non_bool_value_counts_as_unset() {
        let cache = Arc::new(Cache::in_memory());
        cache.set(AUTH_FLAG_KEY, &"true").unwrap();
        assert!(!AuthFlag::new(cache).is_set());
    }
}
