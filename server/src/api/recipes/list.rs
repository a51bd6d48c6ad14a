use super::view::{recipe_responses, RecipeResponse};
use crate::api::{page_links, ErrorResponse};
use crate::auth::OptionalAuthUser;
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::models::{Recipe, User};
use crate::schema::{favorites, recipe_tags, recipes, shopping_carts, tags};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::pg::Pg;
use diesel::prelude::*;
use foodgram_core::{PageRequest, RecipeFilter};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipePage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<RecipeResponse>,
}

/// Apply `filter` for `viewer`. Favorite and cart flags are ignored for anonymous callers.
fn filtered<'a>(filter: &'a RecipeFilter, viewer: Option<&User>) -> recipes::BoxedQuery<'a, Pg> {
    let mut query = recipes::table.into_boxed();

    if let Some(author_id) = filter.author {
        query = query.filter(recipes::author_id.eq(author_id));
    }

    if !filter.tags.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(&filter.tags))
            .select(recipe_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }

    if let Some(viewer) = viewer {
        let favorited = favorites::table
            .filter(favorites::user_id.eq(viewer.id))
            .select(favorites::recipe_id);
        query = match filter.is_favorited {
            Some(true) => query.filter(recipes::id.eq_any(favorited)),
            Some(false) => query.filter(recipes::id.ne_all(favorited)),
            None => query,
        };

        let in_cart = shopping_carts::table
            .filter(shopping_carts::user_id.eq(viewer.id))
            .select(shopping_carts::recipe_id);
        query = match filter.is_in_shopping_cart {
            Some(true) => query.filter(recipes::id.eq_any(in_cart)),
            Some(false) => query.filter(recipes::id.ne_all(in_cart)),
            None => query,
        };
    }

    query
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<i64>, Query, description = "Page size (default: 6, max: 1000)"),
        ("author" = Option<i32>, Query, description = "Only recipes by this user"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs; repeat for any-of matching"),
        ("is_favorited" = Option<u8>, Query, description = "1 for the caller's favorites, 0 to exclude them"),
        ("is_in_shopping_cart" = Option<u8>, Query, description = "1 for recipes in the caller's cart, 0 to exclude them")
    ),
    responses(
        (status = 200, description = "Recipes, newest first", body = RecipePage),
        (status = 400, description = "Invalid filter value", body = ErrorResponse),
        (status = 404, description = "Invalid page", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = RecipeFilter::from_pairs(&pairs)?;
    let request = PageRequest::from_pairs(&pairs);

    // Anonymous callers have no favorites or cart to match
    if viewer.is_none() && filter.requires_user() {
        page_links(&config, "/api/recipes", &pairs, request, 0)?;
        return Ok(Json(RecipePage {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }));
    }

    let mut conn = get_conn(&pool)?;

    let count: i64 = filtered(&filter, viewer.as_ref())
        .count()
        .get_result(&mut conn)?;
    let links = page_links(&config, "/api/recipes", &pairs, request, count)?;

    let page: Vec<Recipe> = filtered(&filter, viewer.as_ref())
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .limit(request.limit)
        .offset(request.offset())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    let results = recipe_responses(&mut conn, &config, viewer.as_ref(), page)?;

    Ok(Json(RecipePage {
        count,
        next: links.next,
        previous: links.previous,
        results,
    }))
}
