use super::IngredientResponse;
use crate::api::ErrorResponse;
use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use foodgram_core::filters::starts_with_pattern;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListIngredientsParams {
    /// Case-insensitive name prefix
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    params(ListIngredientsParams),
    responses(
        (status = 200, description = "Matching ingredients ordered by name", body = Vec<IngredientResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListIngredientsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;

    let mut query = ingredients::table
        .select(Ingredient::as_select())
        .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
        .into_boxed();

    if let Some(prefix) = params.name.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        query = query.filter(ingredients::name.ilike(starts_with_pattern(prefix)));
    }

    let ingredients: Vec<IngredientResponse> = query
        .load(&mut conn)?
        .into_iter()
        .map(IngredientResponse::from)
        .collect();

    Ok(Json(ingredients))
}
