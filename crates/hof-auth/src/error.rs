//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Username or password did not match.
    #[error("Usuário ou senha incorretos")]
    InvalidCredentials,

    /// An admin action was attempted without logging in.
    #[error("Faça login para acessar o painel")]
    NotAuthenticated,

    /// Local storage failed.
    #[error("cache error: {0}")]
    Cache(#[from] hof_cache::CacheError),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::NotAuthenticated
        )
    }
}
