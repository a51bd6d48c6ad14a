use crate::api::ErrorResponse;
use crate::auth::{delete_session, AuthUser, BearerToken};
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/token/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn logout(
    AuthUser(user): AuthUser,
    BearerToken(token): BearerToken,
    State(pool): State<Arc<DbPool>>,
) -> Result<StatusCode, ApiError> {
    let mut conn = get_conn(&pool)?;
    delete_session(&mut conn, &token)?;
    tracing::info!(user_id = user.id, "user logged out");
    Ok(StatusCode::NO_CONTENT)
}
