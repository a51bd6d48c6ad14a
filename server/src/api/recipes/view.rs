//! Read shapes for recipes, assembled with one query per relation.

use crate::api::tags::TagResponse;
use crate::api::users::view::{user_responses, UserResponse};
use crate::config::Config;
use crate::error::ApiError;
use crate::images::image_url;
use crate::models::{Recipe, Tag, User};
use crate::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts, tags, users,
};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    /// Ingredient ID
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i16,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    /// Minutes
    pub cooking_time: i16,
}

/// Compact shape used by favorites, the shopping cart and subscriptions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortRecipeResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i16,
}

pub fn short_recipe(config: &Config, recipe: &Recipe) -> ShortRecipeResponse {
    ShortRecipeResponse {
        id: recipe.id,
        name: recipe.name.clone(),
        image: image_url(config, recipe.image_id),
        cooking_time: recipe.cooking_time,
    }
}

pub fn find_recipe(conn: &mut PgConnection, id: i32) -> Result<Recipe, ApiError> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe"))
}

pub fn recipe_response(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<&User>,
    recipe: Recipe,
) -> Result<RecipeResponse, ApiError> {
    recipe_responses(conn, config, viewer, vec![recipe])?
        .pop()
        .ok_or(ApiError::NotFound("Recipe"))
}

/// Build full read shapes for `recipes`, preserving their order.
pub fn recipe_responses(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<&User>,
    recipes: Vec<Recipe>,
) -> Result<Vec<RecipeResponse>, ApiError> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();

    let mut tags_by_recipe = load_tags(conn, &ids)?;
    let mut ingredients_by_recipe = load_ingredients(conn, &ids)?;
    let authors = load_authors(conn, config, viewer, &recipes)?;
    let (favorited, in_cart) = match viewer {
        Some(viewer) => (
            favorited_ids(conn, viewer.id, &ids)?,
            in_cart_ids(conn, viewer.id, &ids)?,
        ),
        None => (HashSet::new(), HashSet::new()),
    };

    recipes
        .into_iter()
        .map(|recipe| {
            let author = authors
                .get(&recipe.author_id)
                .cloned()
                .ok_or(ApiError::NotFound("User"))?;
            Ok(RecipeResponse {
                id: recipe.id,
                tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
                author,
                ingredients: ingredients_by_recipe.remove(&recipe.id).unwrap_or_default(),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                image: image_url(config, recipe.image_id),
                name: recipe.name,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
            })
        })
        .collect()
}

fn load_tags(
    conn: &mut PgConnection,
    recipe_ids: &[i32],
) -> Result<HashMap<i32, Vec<TagResponse>>, diesel::result::Error> {
    let rows: Vec<(i32, Tag)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, Tag::as_select()))
        .load(conn)?;

    let mut grouped: HashMap<i32, Vec<TagResponse>> = HashMap::new();
    for (recipe_id, tag) in rows {
        grouped.entry(recipe_id).or_default().push(tag.into());
    }
    Ok(grouped)
}

type IngredientRow = (i32, i32, String, String, i16);

fn load_ingredients(
    conn: &mut PgConnection,
    recipe_ids: &[i32],
) -> Result<HashMap<i32, Vec<RecipeIngredientResponse>>, diesel::result::Error> {
    let rows: Vec<IngredientRow> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        .order(recipe_ingredients::id.asc())
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)?;

    let mut grouped: HashMap<i32, Vec<RecipeIngredientResponse>> = HashMap::new();
    for (recipe_id, id, name, measurement_unit, amount) in rows {
        grouped
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredientResponse {
                id,
                name,
                measurement_unit,
                amount,
            });
    }
    Ok(grouped)
}

fn load_authors(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<&User>,
    recipes: &[Recipe],
) -> Result<HashMap<i32, UserResponse>, ApiError> {
    let mut author_ids: Vec<i32> = recipes.iter().map(|r| r.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: Vec<User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load(conn)?;

    Ok(user_responses(conn, config, viewer, authors)?
        .into_iter()
        .map(|author| (author.id, author))
        .collect())
}

fn favorited_ids(
    conn: &mut PgConnection,
    user_id: i32,
    recipe_ids: &[i32],
) -> Result<HashSet<i32>, diesel::result::Error> {
    let ids: Vec<i32> = favorites::table
        .filter(favorites::user_id.eq(user_id))
        .filter(favorites::recipe_id.eq_any(recipe_ids))
        .select(favorites::recipe_id)
        .load(conn)?;
    Ok(ids.into_iter().collect())
}

fn in_cart_ids(
    conn: &mut PgConnection,
    user_id: i32,
    recipe_ids: &[i32],
) -> Result<HashSet<i32>, diesel::result::Error> {
    let ids: Vec<i32> = shopping_carts::table
        .filter(shopping_carts::user_id.eq(user_id))
        .filter(shopping_carts::recipe_id.eq_any(recipe_ids))
        .select(shopping_carts::recipe_id)
        .load(conn)?;
    Ok(ids.into_iter().collect())
}
