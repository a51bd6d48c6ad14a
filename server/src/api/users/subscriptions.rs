use super::view::{
    find_user, parse_recipes_limit, subscription_responses, SubscriptionResponse,
};
use crate::api::edges::{inserted_or_conflict, removed_or_conflict};
use crate::api::{page_links, ErrorResponse};
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::models::{NewSubscription, User};
use crate::schema::{subscriptions, users};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use foodgram_core::validation::validate_subscription;
use foodgram_core::PageRequest;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionPage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<SubscriptionResponse>,
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<i64>, Query, description = "Page size (default: 6, max: 1000)"),
        ("recipes_limit" = Option<i64>, Query, description = "Maximum recipes listed per author")
    ),
    responses(
        (status = 200, description = "Authors the caller follows", body = SubscriptionPage),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Invalid page", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let request = PageRequest::from_pairs(&pairs);

    let count: i64 = subscriptions::table
        .filter(subscriptions::user_id.eq(user.id))
        .count()
        .get_result(&mut conn)?;
    let links = page_links(&config, "/api/users/subscriptions", &pairs, request, count)?;

    let authors: Vec<User> = subscriptions::table
        .inner_join(users::table.on(users::id.eq(subscriptions::author_id)))
        .filter(subscriptions::user_id.eq(user.id))
        .order(users::id.asc())
        .limit(request.limit)
        .offset(request.offset())
        .select(User::as_select())
        .load(&mut conn)?;

    let results = subscription_responses(
        &mut conn,
        &config,
        &user,
        authors,
        parse_recipes_limit(&pairs),
    )?;

    Ok(Json(SubscriptionPage {
        count,
        next: links.next,
        previous: links.previous,
        results,
    }))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author ID"),
        ("recipes_limit" = Option<i64>, Query, description = "Maximum recipes listed")
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Cannot subscribe to yourself", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Already subscribed", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Path(id): Path<i32>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let author = find_user(&mut conn, id)?;
    validate_subscription(user.id, author.id)?;

    let inserted = diesel::insert_into(subscriptions::table)
        .values(&NewSubscription {
            user_id: user.id,
            author_id: author.id,
        })
        .execute(&mut conn);
    inserted_or_conflict(inserted, "You are already subscribed to this author")?;

    tracing::info!(user_id = user.id, author_id = author.id, "subscribed");

    let mut responses = subscription_responses(
        &mut conn,
        &config,
        &user,
        vec![author],
        parse_recipes_limit(&pairs),
    )?;
    let response = responses.pop().ok_or(ApiError::NotFound("User"))?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Not subscribed", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = get_conn(&pool)?;
    let author = find_user(&mut conn, id)?;

    let deleted = diesel::delete(
        subscriptions::table
            .filter(subscriptions::user_id.eq(user.id))
            .filter(subscriptions::author_id.eq(author.id)),
    )
    .execute(&mut conn)?;

    removed_or_conflict(deleted, "You are not subscribed to this author")?;

    tracing::info!(user_id = user.id, author_id = author.id, "unsubscribed");
    Ok(StatusCode::NO_CONTENT)
}
