use super::view::{find_recipe, recipe_response, RecipeResponse};
use super::write::{ensure_references_exist, replace_links, RecipeRequest};
use crate::api::{ErrorResponse, JsonBody};
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::images::{delete_image, store_data_url};
use crate::models::{Recipe, RecipeChanges};
use crate::schema::recipes;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use foodgram_core::DraftMode;
use std::sync::Arc;

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid recipe", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Path(id): Path<i32>,
    JsonBody(req): JsonBody<RecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;

    let existing = find_recipe(&mut conn, id)?;
    if existing.author_id != user.id {
        return Err(ApiError::Forbidden);
    }

    let valid = req.into_draft().validate(DraftMode::Update)?;

    let recipe: Recipe = conn.transaction(|conn| {
        ensure_references_exist(conn, &valid)?;

        let new_image = match valid.image.as_deref() {
            Some(data_url) => Some(store_data_url(conn, data_url)?),
            None => None,
        };

        let recipe: Recipe = diesel::update(recipes::table.find(existing.id))
            .set(&RecipeChanges {
                name: valid.name.as_deref(),
                text: valid.text.as_deref(),
                cooking_time: valid.cooking_time,
                image_id: new_image,
                updated_at: Utc::now(),
            })
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        // The old image is unreferenced once the row points at the new one
        if new_image.is_some() {
            delete_image(conn, existing.image_id)?;
        }

        replace_links(conn, recipe.id, &valid)?;
        Ok::<_, ApiError>(recipe)
    })?;

    tracing::info!(recipe_id = recipe.id, author_id = user.id, "recipe updated");

    Ok(Json(recipe_response(&mut conn, &config, Some(&user), recipe)?))
}
