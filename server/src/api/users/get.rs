use super::view::{find_user, user_response, user_responses, UserResponse};
use crate::api::ErrorResponse;
use crate::auth::{AuthUser, OptionalAuthUser};
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let user = find_user(&mut conn, id)?;

    let mut responses = user_responses(&mut conn, &config, viewer.as_ref(), vec![user])?;
    let response = responses.pop().ok_or(ApiError::NotFound("User"))?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn me(
    AuthUser(user): AuthUser,
    State(config): State<Arc<Config>>,
) -> impl IntoResponse {
    Json(user_response(&config, user, false))
}
