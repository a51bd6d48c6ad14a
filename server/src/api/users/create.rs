use super::view::{user_response, UserResponse};
use crate::api::{ErrorResponse, JsonBody};
use crate::auth::hash_password;
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::models::{NewUser, User};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use foodgram_core::validation::{validate_account, NewAccount};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body(content = CreateUserRequest, example = json!({
        "email": "cook@example.com",
        "username": "cook",
        "first_name": "Julia",
        "last_name": "Child",
        "password": "correct horse"
    })),
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email or username already taken", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = validate_account(NewAccount {
        email: &req.email,
        username: &req.username,
        first_name: &req.first_name,
        last_name: &req.last_name,
        password: &req.password,
    })?;

    let password_hash = hash_password(&req.password).map_err(|e| {
        ApiError::Internal(format!("Failed to hash password: {}", e))
    })?;

    let mut conn = get_conn(&pool)?;

    let new_user = NewUser {
        email: &account.email,
        username: &account.username,
        first_name: &account.first_name,
        last_name: &account.last_name,
        password_hash: &password_hash,
    };

    let user: User = match diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
    {
        Ok(u) => u,
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)) => {
            let message = match info.constraint_name() {
                Some("users_email_key") => "A user with that email already exists",
                _ => "A user with that username already exists",
            };
            return Err(ApiError::conflict(message));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    Ok((StatusCode::CREATED, Json(user_response(&config, user, false))))
}
