use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::models::{NewSession, User};
use crate::schema::{sessions, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_token};

/// Store a new session for `user_id` and return the plaintext token.
pub fn create_session(
    conn: &mut PgConnection,
    user_id: i32,
    ttl_days: i64,
) -> Result<String, diesel::result::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(ttl_days);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

pub fn delete_session(conn: &mut PgConnection, token: &str) -> Result<usize, diesel::result::Error> {
    let token_hash = hash_token(token);
    diesel::delete(sessions::table.filter(sessions::token_hash.eq(&token_hash))).execute(conn)
}

/// Resolve a plaintext token to its user. Unknown or expired tokens are `Ok(None)`;
/// pool and query failures are errors.
pub async fn get_user_from_token(pool: &DbPool, token: &str) -> Result<Option<User>, ApiError> {
    let mut conn = get_conn(pool)?;
    let token_hash = hash_token(token);

    let user = sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use diesel::r2d2::{ConnectionManager, Pool};
    use std::time::Duration as StdDuration;

    #[tokio::test]
    async fn test_unreachable_database_is_an_error() {
        // Nothing listens on port 1, so every checkout times out.
        let manager = ConnectionManager::<PgConnection>::new("postgres://foodgram@127.0.0.1:1/foodgram");
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(StdDuration::from_millis(200))
            .build_unchecked(manager);

        let err = get_user_from_token(&pool, "abc123").await.unwrap_err();
        assert!(matches!(err, ApiError::Pool(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
