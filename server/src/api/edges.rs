//! Outcome mapping for user → recipe and user → author edges (favorites,
//! shopping cart, subscriptions).

use crate::error::ApiError;
use diesel::result::{DatabaseErrorKind, Error as DieselError, QueryResult};

/// A unique violation on insert means the edge already exists.
pub fn inserted_or_conflict(result: QueryResult<usize>, message: &str) -> Result<(), ApiError> {
    match result {
        Ok(_) => Ok(()),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            Err(ApiError::conflict(message))
        }
        Err(e) => Err(e.into()),
    }
}

/// Deleting zero rows means there was no edge to remove.
pub fn removed_or_conflict(deleted: usize, message: &str) -> Result<(), ApiError> {
    if deleted == 0 {
        return Err(ApiError::conflict(message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn unique_violation() -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint \"unique_favorite\"".to_string()),
        )
    }

    #[test]
    fn test_first_insert_succeeds() {
        assert!(inserted_or_conflict(Ok(1), "Recipe is already in favorites").is_ok());
    }

    #[test]
    fn test_second_insert_is_conflict() {
        let err = inserted_or_conflict(Err(unique_violation()), "Recipe is already in favorites")
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Recipe is already in favorites");
    }

    #[test]
    fn test_other_database_errors_are_internal() {
        let fk = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("insert violates foreign key".to_string()),
        );
        let err = inserted_or_conflict(Err(fk), "unused").unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_removing_missing_edge_is_conflict() {
        let err = removed_or_conflict(0, "Recipe is not in favorites").unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(removed_or_conflict(1, "Recipe is not in favorites").is_ok());
    }
}
