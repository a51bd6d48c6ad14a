use super::view::{user_responses, UserResponse};
use crate::api::{page_links, ErrorResponse};
use crate::auth::OptionalAuthUser;
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use foodgram_core::PageRequest;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserPage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<UserResponse>,
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<i64>, Query, description = "Page size (default: 6, max: 1000)")
    ),
    responses(
        (status = 200, description = "Users ordered by id", body = UserPage),
        (status = 404, description = "Invalid page", body = ErrorResponse)
    )
)]
pub async fn list_users(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let request = PageRequest::from_pairs(&pairs);

    let count: i64 = users::table.count().get_result(&mut conn)?;
    let links = page_links(&config, "/api/users", &pairs, request, count)?;

    let page: Vec<User> = users::table
        .order(users::id.asc())
        .limit(request.limit)
        .offset(request.offset())
        .select(User::as_select())
        .load(&mut conn)?;

    Ok(Json(UserPage {
        count,
        next: links.next,
        previous: links.previous,
        results: user_responses(&mut conn, &config, viewer.as_ref(), page)?,
    }))
}
