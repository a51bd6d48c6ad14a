use crate::api::ErrorResponse;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::short_links::resolve;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

/// Returns the router for short-link redirects (mounted at the root)
pub fn router() -> Router<AppState> {
    Router::new().route("/s/{code}", get(redirect))
}

#[utoipa::path(
    get,
    path = "/s/{code}",
    tag = "short_links",
    params(
        ("code" = String, Path, description = "Short code")
    ),
    responses(
        (status = 302, description = "Redirect to the original URL"),
        (status = 404, description = "Unknown short code", body = ErrorResponse)
    )
)]
pub async fn redirect(
    State(pool): State<Arc<DbPool>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let original_url = resolve(&mut conn, &code)?.ok_or(ApiError::NotFound("Short link"))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]))
}

#[derive(OpenApi)]
#[openapi(paths(redirect))]
pub struct ApiDoc;
