use crate::api::{ErrorResponse, JsonBody};
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::images::{delete_image, image_url, store_data_url};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use diesel::prelude::*;
use foodgram_core::ValidationError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetAvatarRequest {
    /// Base64 data URL, e.g. `data:image/png;base64,...`
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvatarResponse {
    pub avatar: String,
}

#[utoipa::path(
    put,
    path = "/api/users/me/avatar",
    tag = "users",
    request_body = SetAvatarRequest,
    responses(
        (status = 200, description = "Avatar replaced", body = AvatarResponse),
        (status = 400, description = "Missing or invalid image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn set_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    JsonBody(req): JsonBody<SetAvatarRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let data_url = req
        .avatar
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .ok_or(ValidationError::MissingAvatar)?;

    let mut conn = get_conn(&pool)?;

    let image_id = conn.transaction(|conn| {
        let image_id = store_data_url(conn, data_url)?;
        diesel::update(users::table.find(user.id))
            .set((
                users::avatar_id.eq(Some(image_id)),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;
        if let Some(previous) = user.avatar_id {
            delete_image(conn, previous)?;
        }
        Ok::<_, ApiError>(image_id)
    })?;

    tracing::info!(user_id = user.id, %image_id, "avatar updated");

    Ok(Json(AvatarResponse {
        avatar: image_url(&config, image_id),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/me/avatar",
    tag = "users",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn delete_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<StatusCode, ApiError> {
    let Some(previous) = user.avatar_id else {
        return Ok(StatusCode::NO_CONTENT);
    };

    let mut conn = get_conn(&pool)?;
    conn.transaction(|conn| {
        diesel::update(users::table.find(user.id))
            .set((
                users::avatar_id.eq(None::<uuid::Uuid>),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;
        delete_image(conn, previous)
    })?;

    tracing::info!(user_id = user.id, "avatar removed");
    Ok(StatusCode::NO_CONTENT)
}
