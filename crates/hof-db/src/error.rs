//! Database error types.

use hof_commerce::PersistenceError;
use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;

/// Errors that can occur when using the database.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to reach the database.
    #[error("Failed to connect to database: {0}")]
    Unavailable(String),

    /// No rows returned or affected when one was expected.
    #[error("No rows returned")]
    NotFound,

    /// A unique key is already taken.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row does not exist.
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// A stored value could not be turned into a domain value.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Failed to execute a query.
    #[error("Query execution failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for DbError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => return Self::NotFound,
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => return Self::Unavailable(error.to_string()),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_) => return Self::Decode(error.to_string()),
            _ => {}
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::UniqueViolation(error.to_string()),
            Some(ErrorKind::ForeignKeyViolation) => Self::ForeignKeyViolation(error.to_string()),
            Some(ErrorKind::Other | _) | None => Self::Query(error.to_string()),
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::Unavailable(msg) => PersistenceError::Unavailable(msg),
            DbError::NotFound => PersistenceError::NotFound("row".to_string()),
            DbError::UniqueViolation(msg) | DbError::ForeignKeyViolation(msg) => {
                PersistenceError::Conflict(msg)
            }
            DbError::Decode(msg) | DbError::Query(msg) => PersistenceError::Query(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::NotFound));
        assert!(matches!(
            PersistenceError::from(err),
            PersistenceError::NotFound(_)
        ));
    }

    #[test]
    fn test_pool_errors_are_unavailable() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::Unavailable(_)));

        let err = DbError::from(sqlx::Error::PoolClosed);
        assert!(matches!(
            PersistenceError::from(err),
            PersistenceError::Unavailable(_)
        ));
    }

    #[test]
    fn test_missing_column_is_decode_error() {
        let err = DbError::from(sqlx::Error::ColumnNotFound("price_cents".into()));
        assert!(matches!(err, DbError::Decode(_)));
        assert!(matches!(
            PersistenceError::from(err),
            PersistenceError::Query(_)
        ));
    }

    #[test]
    fn test_constraint_violations_are_conflicts() {
        let unique = DbError::UniqueViolation("categories_slug_key".into());
        assert_eq!(
            PersistenceError::from(unique),
            PersistenceError::Conflict("categories_slug_key".into())
        );

        let fk = DbError::ForeignKeyViolation("order_items_order_id_fkey".into());
        assert!(matches!(
            PersistenceError::from(fk),
            PersistenceError::Conflict(_)
        ));
    }
}
