use crate::api::ErrorResponse;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::schema::images;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use diesel::prelude::*;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

/// Returns the router for stored images (mounted at the root)
pub fn router() -> Router<AppState> {
    Router::new().route("/media/{id}", get(get_image))
}

#[utoipa::path(
    get,
    path = "/media/{id}",
    tag = "media",
    params(
        ("id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
pub async fn get_image(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;

    let (content_type, data): (String, Vec<u8>) = images::table
        .find(id)
        .select((images::content_type, images::data))
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Image"))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
        ],
        data,
    ))
}

#[derive(OpenApi)]
#[openapi(paths(get_image))]
pub struct ApiDoc;
