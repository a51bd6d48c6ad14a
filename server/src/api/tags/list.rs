use super::TagResponse;
use crate::api::ErrorResponse;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::models::Tag;
use crate::schema::tags;
use axum::{extract::State, response::IntoResponse, Json};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "tags",
    responses(
        (status = 200, description = "All tags, unpaginated", body = Vec<TagResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_tags(State(pool): State<Arc<DbPool>>) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;

    let tags: Vec<TagResponse> = tags::table
        .order(tags::name.asc())
        .select(Tag::as_select())
        .load(&mut conn)?
        .into_iter()
        .map(TagResponse::from)
        .collect();

    Ok(Json(tags))
}
