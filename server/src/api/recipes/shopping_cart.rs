use super::view::{find_recipe, short_recipe, ShortRecipeResponse};
use crate::api::edges::{inserted_or_conflict, removed_or_conflict};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::models::NewShoppingCartItem;
use crate::schema::{ingredients, recipe_ingredients, shopping_carts};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use foodgram_core::constants::SHOPPING_LIST_FILE_NAME;
use foodgram_core::ShoppingList;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to the shopping cart", body = ShortRecipeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Already in the shopping cart", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn add_to_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let recipe = find_recipe(&mut conn, id)?;

    let inserted = diesel::insert_into(shopping_carts::table)
        .values(&NewShoppingCartItem {
            user_id: user.id,
            recipe_id: recipe.id,
        })
        .execute(&mut conn);
    inserted_or_conflict(inserted, "Recipe is already in the shopping cart")?;

    tracing::debug!(user_id = user.id, recipe_id = recipe.id, "added to shopping cart");
    Ok((StatusCode::CREATED, Json(short_recipe(&config, &recipe))))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Removed from the shopping cart"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Recipe is not in the shopping cart", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn remove_from_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = get_conn(&pool)?;
    let recipe = find_recipe(&mut conn, id)?;

    let deleted = diesel::delete(
        shopping_carts::table
            .filter(shopping_carts::user_id.eq(user.id))
            .filter(shopping_carts::recipe_id.eq(recipe.id)),
    )
    .execute(&mut conn)?;

    removed_or_conflict(deleted, "Recipe is not in the shopping cart")?;

    tracing::debug!(user_id = user.id, recipe_id = recipe.id, "removed from shopping cart");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    tag = "recipes",
    responses(
        (status = 200, description = "Plain-text shopping list summed across the cart", body = String, content_type = "text/plain"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;

    let rows: Vec<(String, String, i16)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .inner_join(
            shopping_carts::table.on(shopping_carts::recipe_id.eq(recipe_ingredients::recipe_id)),
        )
        .filter(shopping_carts::user_id.eq(user.id))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(&mut conn)?;

    let list = ShoppingList::aggregate(
        rows.into_iter()
            .map(|(name, unit, amount)| (name, unit, i64::from(amount))),
    );

    tracing::debug!(user_id = user.id, lines = list.entries().len(), "shopping list exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", SHOPPING_LIST_FILE_NAME),
            ),
        ],
        list.render(),
    ))
}
