use super::view::{recipe_response, RecipeResponse};
use super::write::{ensure_references_exist, replace_links, RecipeRequest};
use crate::api::{ErrorResponse, JsonBody};
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::images::store_data_url;
use crate::models::{NewRecipe, Recipe};
use crate::schema::recipes;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use foodgram_core::{DraftMode, ValidationError};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid recipe", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    JsonBody(req): JsonBody<RecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let valid = req.into_draft().validate(DraftMode::Create)?;
    let name = valid
        .name
        .as_deref()
        .ok_or(ValidationError::MissingField("name"))?;
    let text = valid
        .text
        .as_deref()
        .ok_or(ValidationError::MissingField("text"))?;
    let cooking_time = valid
        .cooking_time
        .ok_or(ValidationError::MissingField("cooking_time"))?;
    let image = valid.image.as_deref().ok_or(ValidationError::MissingImage)?;

    let mut conn = get_conn(&pool)?;

    // Image, recipe row and both link sets are written atomically
    let recipe: Recipe = conn.transaction(|conn| {
        ensure_references_exist(conn, &valid)?;
        let image_id = store_data_url(conn, image)?;

        let recipe: Recipe = diesel::insert_into(recipes::table)
            .values(&NewRecipe {
                author_id: user.id,
                name,
                text,
                cooking_time,
                image_id,
            })
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        replace_links(conn, recipe.id, &valid)?;
        Ok::<_, ApiError>(recipe)
    })?;

    tracing::info!(recipe_id = recipe.id, author_id = user.id, "recipe created");

    let response = recipe_response(&mut conn, &config, Some(&user), recipe)?;
    Ok((StatusCode::CREATED, Json(response)))
}
